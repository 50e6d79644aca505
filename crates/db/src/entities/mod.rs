//! `SeaORM` entity definitions.

pub mod posts;
pub mod users;

pub mod prelude {
    //! Entity re-exports.

    pub use super::posts::Entity as Posts;
    pub use super::users::Entity as Users;
}
