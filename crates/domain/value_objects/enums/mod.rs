pub mod bw_statuses;
pub mod bw_types;
pub mod error_tokens;
pub mod invitation_statuses;
pub mod role_types;
pub mod subscription_statuses;
