// Domain layer: descriptors handed to the CMS framework and the environment port.
// No I/O here beyond what `ProcessEnv` reads.

pub mod model;
pub mod ports;
