//! Shared URIs
//!
//! These are the exact paths the backend routes on. The trailing slash on the
//! grant application collection is significant.

pub const API_AUTH_REGISTER: &str = "/api/auth/register";
pub const API_AUTH_LOGIN: &str = "/api/auth/login";
pub const API_AUTH_LOGOUT: &str = "/api/auth/logout";
pub const API_AUTH_VERIFY: &str = "/api/auth/verify";
pub const API_AUTH_REFRESH: &str = "/api/auth/refresh";

pub const API_REALTORS_PROFILE: &str = "/api/realtors/profile";
pub const API_REALTORS_UPLOAD_HEADSHOT: &str = "/api/realtors/upload-headshot";
pub const API_REALTORS_STATS: &str = "/api/realtors/stats";

pub const API_TRANSACTIONS_SUBMIT: &str = "/api/transactions/submit";
pub const API_TRANSACTIONS_HISTORY: &str = "/api/transactions/history";
pub const API_TRANSACTIONS_CURRENT_MONTH: &str = "/api/transactions/current-month";
pub const API_TRANSACTIONS_PENDING: &str = "/api/transactions/pending";

pub const API_DONATIONS_PAYMENT: &str = "/api/donations/payment";
pub const API_DONATIONS_STATS: &str = "/api/donations/stats";
pub const API_DONATIONS_HISTORY: &str = "/api/donations/history";
pub const API_DONATIONS_PENDING: &str = "/api/donations/pending";
pub const API_DONATIONS_SHARE_IMAGE: &str = "/api/donations/share-image";

pub const API_NOTIFICATIONS: &str = "/api/notifications";
pub const API_NOTIFICATIONS_UNREAD_COUNT: &str = "/api/notifications/unread-count";
pub const API_NOTIFICATIONS_MARK_ALL_READ: &str = "/api/notifications/mark-all-read";

pub const API_GRANT_APPLICATIONS: &str = "/api/grant-applications/";
pub const API_GRANT_APPLICATIONS_VALIDATE_ADDRESS: &str =
    "/api/grant-applications/validate-address";

pub const API_ADMIN_STATS: &str = "/api/admin/stats";
pub const API_ADMIN_REALTORS: &str = "/api/admin/realtors";
pub const API_ADMIN_REALTORS_PENDING: &str = "/api/admin/realtors/pending";
pub const API_ADMIN_TRANSACTIONS: &str = "/api/admin/transactions";
pub const API_ADMIN_DONATIONS: &str = "/api/admin/donations";
pub const API_ADMIN_SEND_MONTHLY_REMINDERS: &str = "/api/admin/send-monthly-reminders";
