pub mod generate;
pub mod normalize;
pub mod show;
pub mod validate;

pub use self::generate::generate;
pub use self::normalize::normalize;
pub use self::show::show;
pub use self::validate::validate;
