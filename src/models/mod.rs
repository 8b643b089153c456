mod devices;

pub use devices::*;
