pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nseasonal indices: DJF station index, spatial correlation",
    "\ndiagnostics: solar geometry, regional aggregates, monthly analyses"
);
