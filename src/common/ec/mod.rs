mod galois;
mod poly;

pub use poly::Poly;
