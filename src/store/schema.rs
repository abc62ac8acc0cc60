//! Diesel table definitions.

diesel::table! {
    notifications (id) {
        id -> Text,
        wallet_address -> Text,
        kind -> Text,
        title -> Text,
        message -> Text,
        link -> Nullable<Text>,
        metadata -> Nullable<Text>,
        read -> Bool,
        read_at -> Nullable<Text>,
        created_at -> Text,
        expires_at -> Nullable<Text>,
    }
}
