//! Login, session check and logout.
pub mod check;
pub mod login;
pub mod logout;

pub use check::CheckSessionController;
pub use login::LoginController;
pub use logout::LogoutController;
