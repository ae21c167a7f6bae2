//! Contractor onboarding workflow engine.
//!
//! A contractor moves through the status graph in [`state_machine`] along one of five routes.
//! Each route is an [`OnboardingStrategy`] looked up through the [`StrategyRegistry`]; the
//! [`OnboardingService`] resolves the strategy, executes a step, persists the resulting status,
//! and hands external actions to a [`NotificationSender`].

pub mod catalog;
pub mod domain;
pub mod notifications;
pub mod registry;
pub mod repository;
pub mod router;
pub mod service;
pub mod state_machine;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use domain::{
    ContractorId, ContractorStatus, ExternalAction, OnboardingResult, OnboardingRoute, StepData,
    UnknownRoute, UnknownStatus, WorkflowStep,
};
pub use notifications::{NotificationEnvelope, NotificationError, NotificationSender, Recipient};
pub use registry::{RegistryError, RouteInfo, StrategyRegistry};
pub use repository::{
    ContractorProfile, ContractorRecord, ContractorRepository, RepositoryError, RouteAssignment,
    StatusUpdate,
};
pub use router::onboarding_router;
pub use service::{
    Actor, NextAction, OnboardingService, OnboardingServiceError, RouteDocuments,
    WorkflowStatusView,
};
pub use state_machine::{InvalidTransition, WorkflowProgress};
pub use strategy::{
    FreelancerStrategy, OffshoreStrategy, OnboardingStrategy, SaudiStrategy, UaeStrategy,
    WpsStrategy,
};
