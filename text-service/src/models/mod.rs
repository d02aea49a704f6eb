pub mod text;

pub use text::Text;
