use super::model::QueueingModel;
use super::report::SimulationReport;
use super::topology::NetworkDescription;
use crate::core::config::SimulationConfig;
use crate::core::errors::SimResult;
use crate::core::event::Event;
use crate::core::simulation_engine::{RunSummary, SimulationEngine, SimulationObserver};

/// A queueing network wired to an engine, ready to run
pub struct NetworkSimulation {
    engine: SimulationEngine<Event>,
    model: QueueingModel,
}

impl NetworkSimulation {
    /// Build the model and schedule all generated arrivals
    pub fn new(description: &NetworkDescription, config: &SimulationConfig) -> SimResult<Self> {
        let mut engine = SimulationEngine::new(config.end_time);
        let model = QueueingModel::build(description, config, engine.scheduler_mut())?;
        Ok(Self { engine, model })
    }

    /// Parse a description and build it in one go
    pub fn from_text(text: &str, config: &SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        let description = NetworkDescription::parse(text, config.probability_tolerance)?;
        Self::new(&description, config)
    }

    /// Add an observer to the underlying engine
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver<Event>>) {
        self.engine.add_observer(observer);
    }

    /// Run until the horizon or until no events remain
    pub fn run(&mut self) -> SimResult<RunSummary> {
        self.engine.run(&mut self.model)
    }

    pub fn model(&self) -> &QueueingModel {
        &self.model
    }

    /// Build the end-of-run report
    pub fn report(&self) -> SimulationReport {
        SimulationReport::from_model(&self.model)
    }
}
