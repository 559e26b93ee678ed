// Geolocation infrastructure - MaxMind reader and a static test fixture

mod maxmind_resolver;

pub use maxmind_resolver::{MaxMindGeoResolver, StaticGeoResolver};
