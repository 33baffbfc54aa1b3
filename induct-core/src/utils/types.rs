/// Alias to a scalar floating type.
///
/// NOTE: `f64` is used everywhere as objective values accumulate over whole fleets and
/// switching to `f32` gives no measurable benefit at this problem size.
pub type Float = f64;
