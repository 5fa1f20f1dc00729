//! Diesel table definitions.
//!
//! Mirrors the dashboard-owned schema; migrations live with the dashboard
//! backend, not here.

diesel::table! {
    audit_logs (id) {
        id -> Int4,
        server_id -> Int8,
        user_id -> Int8,
        action -> Text,
        target_type -> Text,
        target_id -> Text,
        details -> Nullable<Jsonb>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    discord_channels (id) {
        id -> Int8,
        name -> Text,
        first_seen -> Timestamp,
        last_seen -> Timestamp,
    }
}

diesel::table! {
    discord_users (id) {
        id -> Int8,
        username -> Text,
        first_seen -> Timestamp,
        last_seen -> Timestamp,
    }
}

diesel::table! {
    embed_configs (id) {
        id -> Int4,
        server_id -> Int8,
        feature_id -> Uuid,
        prefix -> Text,
        embed_type -> Text,
        priority -> Int4,
        active -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    features (id) {
        id -> Uuid,
        name -> Text,
        active -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    message_data (message_id) {
        message_id -> Int8,
        channel_id -> Int8,
        server_id -> Int8,
        user_id -> Int8,
        original_url -> Text,
        embedded_url -> Nullable<Text>,
        embed_prefix_used -> Nullable<Text>,
        validation_status -> Text,
        validation_error -> Nullable<Text>,
        webhook_message_id -> Nullable<Int8>,
        checked_at -> Timestamp,
    }
}

diesel::table! {
    pruning_config (server_id) {
        server_id -> Int8,
        enabled -> Bool,
        max_days -> Int4,
        updated_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    audit_logs,
    discord_channels,
    discord_users,
    embed_configs,
    features,
    message_data,
    pruning_config,
);
