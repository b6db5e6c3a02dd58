pub mod business_walls;
pub mod bw_catalogue;
pub mod bw_progress;
pub mod emails;
pub mod enums;
pub mod invitations;
pub mod users;
