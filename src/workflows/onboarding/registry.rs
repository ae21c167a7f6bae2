use std::sync::{Arc, OnceLock};

use serde::Serialize;

use super::domain::OnboardingRoute;
use super::strategy::{
    FreelancerStrategy, OffshoreStrategy, OnboardingStrategy, SaudiStrategy, UaeStrategy,
    WpsStrategy,
};

type StrategyFactory = fn() -> Arc<dyn OnboardingStrategy>;

fn build<S>() -> Arc<dyn OnboardingStrategy>
where
    S: OnboardingStrategy + Default + 'static,
{
    Arc::new(S::default())
}

#[derive(Debug)]
struct RegistryEntry {
    route: OnboardingRoute,
    factory: StrategyFactory,
    instance: OnceLock<Arc<dyn OnboardingStrategy>>,
}

impl RegistryEntry {
    fn new(route: OnboardingRoute, factory: StrategyFactory) -> Self {
        Self {
            route,
            factory,
            instance: OnceLock::new(),
        }
    }

    fn strategy(&self) -> Arc<dyn OnboardingStrategy> {
        Arc::clone(self.instance.get_or_init(self.factory))
    }
}

/// Directory of route strategies keyed by route id.
///
/// Built once by the composition root and shared by reference. Instances are constructed on
/// first lookup and cached for the lifetime of the registry.
#[derive(Debug)]
pub struct StrategyRegistry {
    entries: Vec<RegistryEntry>,
}

impl StrategyRegistry {
    /// Registry holding the five built-in routes in their canonical order.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                RegistryEntry::new(OnboardingRoute::Uae, build::<UaeStrategy>),
                RegistryEntry::new(OnboardingRoute::Saudi, build::<SaudiStrategy>),
                RegistryEntry::new(OnboardingRoute::Offshore, build::<OffshoreStrategy>),
                RegistryEntry::new(OnboardingRoute::Wps, build::<WpsStrategy>),
                RegistryEntry::new(OnboardingRoute::Freelancer, build::<FreelancerStrategy>),
            ],
        }
    }

    fn entry(&self, route_id: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.route.as_str() == route_id)
    }

    pub fn get(&self, route_id: &str) -> Result<Arc<dyn OnboardingStrategy>, RegistryError> {
        self.entry(route_id)
            .map(RegistryEntry::strategy)
            .ok_or_else(|| RegistryError::UnknownRoute {
                route: route_id.to_string(),
                available: self.available_routes(),
            })
    }

    pub fn get_or_none(&self, route_id: &str) -> Option<Arc<dyn OnboardingStrategy>> {
        self.entry(route_id).map(RegistryEntry::strategy)
    }

    pub fn get_route(
        &self,
        route: OnboardingRoute,
    ) -> Result<Arc<dyn OnboardingStrategy>, RegistryError> {
        self.get(route.as_str())
    }

    pub fn is_registered(&self, route_id: &str) -> bool {
        self.entry(route_id).is_some()
    }

    pub fn available_routes(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .map(|entry| entry.route.as_str())
            .collect()
    }

    pub fn route_info(&self) -> Vec<RouteInfo> {
        self.entries
            .iter()
            .map(|entry| {
                let strategy = entry.strategy();
                RouteInfo {
                    id: entry.route.as_str(),
                    display_name: strategy.display_name(),
                    required_documents: strategy.required_documents().len(),
                    workflow_steps: strategy.workflow_steps().len(),
                }
            })
            .collect()
    }

    pub fn all_strategies(&self) -> Vec<(OnboardingRoute, Arc<dyn OnboardingStrategy>)> {
        self.entries
            .iter()
            .map(|entry| (entry.route, entry.strategy()))
            .collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Discovery summary for a registered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub required_documents: usize,
    pub workflow_steps: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("no strategy registered for route '{route}'; available routes: {}", available.join(", "))]
    UnknownRoute {
        route: String,
        available: Vec<&'static str>,
    },
}
