// Table definitions for Diesel's compile-time query checking.

diesel::table! {
    analysis_logs (id) {
        id -> Integer,
        request_text -> Text,
        response_text -> Text,
        timestamp -> Text,
    }
}
