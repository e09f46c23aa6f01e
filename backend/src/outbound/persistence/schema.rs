//! Diesel table definitions. Kept in sync with the SQL under `migrations/`.

diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    attractions (place_id) {
        place_id -> Varchar,
        name -> Nullable<Varchar>,
        formatted_address -> Nullable<Varchar>,
        country -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        category -> Nullable<Varchar>,
        types -> Array<Text>,
        rating -> Nullable<Float8>,
        user_ratings_total -> Int4,
        price_level -> Nullable<Int4>,
        lat -> Nullable<Float8>,
        lng -> Nullable<Float8>,
        photo_reference -> Nullable<Varchar>,
        photos_count -> Int4,
        website -> Nullable<Varchar>,
        phone_number -> Nullable<Varchar>,
        opening_hours -> Nullable<Jsonb>,
        raw_data -> Nullable<Jsonb>,
        likes -> Int4,
        is_featured -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    compilations (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    compilation_items (compilation_id, place_id) {
        compilation_id -> Uuid,
        place_id -> Varchar,
        position -> Int4,
        added_at -> Timestamptz,
    }
}

diesel::joinable!(compilations -> users (owner_id));
diesel::joinable!(compilation_items -> compilations (compilation_id));

diesel::allow_tables_to_appear_in_same_query!(users, attractions, compilations, compilation_items);
