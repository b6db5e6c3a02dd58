pub mod business_walls;
pub mod organisations;
pub mod role_assignments;
pub mod users;
