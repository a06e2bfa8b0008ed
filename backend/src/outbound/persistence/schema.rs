//! Diesel table definitions for the shared tables.
//!
//! Audit rows live in one table per business line (`<line>_audit_data`) and
//! are reached through `sql_query`, so they have no entry here.

diesel::table! {
    /// Provisioned auditors. Emails are matched case-insensitively.
    users (user_mail) {
        user_mail -> Text,
        password -> Text,
        user_first_name -> Text,
        user_last_name -> Text,
    }
}

diesel::table! {
    /// Monthly location assignments per auditor.
    user_accessible_locations (user_mail, location_id) {
        user_mail -> Text,
        location_id -> Text,
        location_name -> Text,
        business_line -> Text,
        /// `Mon-YYYY`, e.g. `Mar-2025`.
        assigned_month -> Text,
    }
}

diesel::table! {
    /// Audit questions shared by every location of a business line.
    checklist (business_line, unique_id) {
        unique_id -> Text,
        description -> Text,
        impact -> Nullable<Text>,
        weightage -> Nullable<Int4>,
        owner -> Nullable<Text>,
        department -> Nullable<Text>,
        business_line -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, user_accessible_locations, checklist);
