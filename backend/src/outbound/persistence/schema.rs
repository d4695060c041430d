//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Dining experiences, one row per record.
    ///
    /// `user_id` is the identity provider's account id, not a local key.
    dining_experiences (id) {
        id -> Uuid,
        user_id -> Varchar,
        name -> Varchar,
        restaurant -> Varchar,
        location -> Varchar,
        date -> Timestamptz,
        /// 1..=5; legacy rows may hold 0 for "not rated".
        rating -> Nullable<Int2>,
        notes -> Nullable<Text>,
        cuisine -> Nullable<Varchar>,
        price_range -> Nullable<Varchar>,
        guests -> Nullable<Int4>,
        /// One of `upcoming`, `completed`, `cancelled`.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Messages submitted through the contact form.
    contact_messages (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        message -> Text,
        created_at -> Timestamptz,
    }
}
