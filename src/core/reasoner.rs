use crate::core::ontology::SemanticModel;
use crate::domain::ports::{Reasoner, ReasonerKind, ReasoningReport};
use crate::utils::error::Result;
use std::sync::Arc;

const DEFAULT_MAX_PASSES: usize = 16;

/// 前向推論：每次呼叫都重新走訪整個模型，直到沒有新事實為止
#[derive(Debug, Clone)]
pub struct RuleReasoner {
    max_passes: usize,
}

impl RuleReasoner {
    pub fn new() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }
}

impl Default for RuleReasoner {
    fn default() -> Self {
        Self::new()
    }
}

impl Reasoner for RuleReasoner {
    fn name(&self) -> &str {
        "rules"
    }

    fn reason(&self, model: &mut SemanticModel) -> Result<ReasoningReport> {
        let mut report = ReasoningReport::default();

        loop {
            report.passes += 1;
            report.individuals_visited += model.individuals().len();

            let mut pending = Vec::new();
            for (id, individual) in model.iter_individuals() {
                for rule in model.rules() {
                    if model.rule_applies(rule, individual)
                        && !individual.values(rule.then_property).contains(&rule.then_value)
                    {
                        pending.push((id, rule.then_property, rule.then_value));
                    }
                }
            }

            let mut inferred = 0;
            for (id, property, value) in pending {
                if model.assert_data_value(id, property, value) {
                    inferred += 1;
                }
            }
            report.facts_inferred += inferred;

            if inferred == 0 {
                break;
            }
            if report.passes >= self.max_passes {
                tracing::warn!(
                    "⚠️ Reasoner stopped after {} passes without reaching a fixpoint",
                    report.passes
                );
                break;
            }
        }

        Ok(report)
    }
}

/// 從不推論任何事實
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReasoner;

impl Reasoner for NoopReasoner {
    fn name(&self) -> &str {
        "none"
    }

    fn reason(&self, _model: &mut SemanticModel) -> Result<ReasoningReport> {
        Ok(ReasoningReport::default())
    }
}

pub fn build_reasoner(kind: ReasonerKind) -> Arc<dyn Reasoner> {
    match kind {
        ReasonerKind::Rules => Arc::new(RuleReasoner::new()),
        ReasonerKind::None => Arc::new(NoopReasoner),
    }
}
