/// Object owner (RCAI assignment) entity module
pub mod object_owner;
/// Permission override entity module
pub mod permission_override;
/// User profile entity module
pub mod user_profile;

pub use object_owner::Entity as ObjectOwner;
pub use permission_override::Entity as PermissionOverride;
pub use user_profile::Entity as UserProfile;
