//! Cross-module scenarios exercising the world, the index and the resolver

mod collision_scenarios;
