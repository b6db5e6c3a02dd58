pub mod business_walls;
pub mod bw_activation;
pub mod errors;
pub mod membership;
pub mod notifications;
pub mod organisation_gc;
pub mod role_invitations;
pub mod role_query;
pub mod stage_gate;

#[cfg(test)]
pub mod test_support;
