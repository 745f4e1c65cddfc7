mod binary;
mod mask;
mod pair;

pub use binary::BinaryMask;

pub use mask::VevalMask;
pub use mask::palette_color;

pub use pair::MaskPair;
