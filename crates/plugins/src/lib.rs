//! Built-in plugin implementations for Parley.
//!
//! Plugins serve narrow intents deterministically: looking up the weather
//! for a city, evaluating an arithmetic expression. Anything they cannot
//! handle falls through to the response generator.

pub mod calculator;
pub mod weather;

use parley_config::WeatherConfig;
use parley_core::PluginRegistry;

pub use calculator::CalculatorPlugin;
pub use weather::WeatherPlugin;

/// Create the default plugin registry.
///
/// Registration order is the dispatch priority: weather is tried before the
/// calculator so that a message like "weather in Paris plus 2" reaches the
/// weather handler instead of being misparsed as arithmetic.
pub fn default_registry(weather: &WeatherConfig) -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register(Box::new(WeatherPlugin::new(weather.clone())));
    registry.register(Box::new(CalculatorPlugin::new()));
    registry
}
