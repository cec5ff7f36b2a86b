use crate::core::ontology::{SemanticModel, SENTIMENT_PROPERTY, TRAIN_CLASS};
use crate::domain::model::{Category, SentimentValue};
use crate::domain::ports::{Reasoner, ReasoningReport};
use crate::utils::error::{AnalysisError, Result, SchemaElement};

/// Reasoner 是否給出了 hasSentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Inferred(SentimentValue),
    Fallback(SentimentValue),
}

impl Resolution {
    pub fn value(self) -> SentimentValue {
        match self {
            Resolution::Inferred(value) | Resolution::Fallback(value) => value,
        }
    }

    pub fn is_inferred(self) -> bool {
        matches!(self, Resolution::Inferred(_))
    }
}

pub struct SemanticOverlay<'a> {
    reasoner: &'a dyn Reasoner,
}

impl<'a> SemanticOverlay<'a> {
    pub fn new(reasoner: &'a dyn Reasoner) -> Self {
        Self { reasoner }
    }

    pub fn individual_name(index: usize) -> String {
        format!("Train_instance_{}", index)
    }

    /// 為訊息建立一個 Train 個體、寫入分類屬性並對整個模型推論一次
    pub fn resolve(
        &self,
        model: &mut SemanticModel,
        index: usize,
        category: Category,
        raw: SentimentValue,
    ) -> Result<(Resolution, ReasoningReport)> {
        let train = model
            .class(TRAIN_CLASS)
            .ok_or_else(|| AnalysisError::SchemaMismatch {
                element: SchemaElement::Class,
                name: TRAIN_CLASS.to_string(),
            })?;
        let property = model
            .data_property(category.property_name())
            .ok_or_else(|| AnalysisError::SchemaMismatch {
                element: SchemaElement::DataProperty,
                name: category.property_name().to_string(),
            })?;

        let individual = model.create_individual(train, Self::individual_name(index))?;
        model.set_data_property(individual, property, vec![raw.as_i64()]);

        let report = self.reasoner.reason(model)?;

        let inferred = model
            .data_property(SENTIMENT_PROPERTY)
            .and_then(|sentiment| model.data_values(individual, sentiment).first().copied());

        let resolution = match inferred {
            Some(value) => Resolution::Inferred(SentimentValue::from_inferred(value)),
            None => Resolution::Fallback(raw),
        };

        tracing::debug!(
            "Train_instance_{} {} raw={} -> {:?} ({} passes, {} individuals)",
            index,
            category.property_name(),
            raw,
            resolution,
            report.passes,
            report.individuals_visited
        );

        Ok((resolution, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ontology::{AssertionDecl, ConditionDecl, OntologyDocument, RuleDecl};
    use crate::core::reasoner::{NoopReasoner, RuleReasoner};

    fn default_model() -> SemanticModel {
        SemanticModel::from_document(&OntologyDocument::railway_default(), "inline").unwrap()
    }

    fn model_with_rule(property: &str, equals: i64, infer: i64) -> SemanticModel {
        let mut document = OntologyDocument::railway_default();
        document.rules.push(RuleDecl {
            name: "override".to_string(),
            class: Some(TRAIN_CLASS.to_string()),
            when: vec![ConditionDecl {
                property: property.to_string(),
                equals: Some(equals),
                min: None,
                max: None,
            }],
            then: AssertionDecl {
                property: SENTIMENT_PROPERTY.to_string(),
                value: infer,
            },
        });
        SemanticModel::from_document(&document, "inline").unwrap()
    }

    #[test]
    fn test_fallback_when_nothing_inferred() {
        let mut model = default_model();
        let overlay = SemanticOverlay::new(&NoopReasoner);

        for (index, raw) in [SentimentValue::Positive, SentimentValue::Neutral, SentimentValue::Negative]
            .into_iter()
            .enumerate()
        {
            let (resolution, _) = overlay.resolve(&mut model, index, Category::Security, raw).unwrap();
            assert_eq!(resolution, Resolution::Fallback(raw));
        }
        assert_eq!(model.individuals().len(), 3);
    }

    #[test]
    fn test_inferred_value_overrides_raw() {
        let mut model = model_with_rule("hasSecurity", 0, -1);
        let reasoner = RuleReasoner::new();
        let overlay = SemanticOverlay::new(&reasoner);

        let (resolution, report) = overlay
            .resolve(&mut model, 4, Category::Security, SentimentValue::Neutral)
            .unwrap();

        assert_eq!(resolution, Resolution::Inferred(SentimentValue::Negative));
        assert!(resolution.is_inferred());
        assert_eq!(report.facts_inferred, 1);
        assert!(model.find_individual("Train_instance_4").is_some());
    }

    #[test]
    fn test_rule_for_other_category_does_not_fire() {
        let mut model = model_with_rule("hasSecurity", 0, -1);
        let reasoner = RuleReasoner::new();
        let overlay = SemanticOverlay::new(&reasoner);

        let (resolution, _) = overlay
            .resolve(&mut model, 0, Category::Cleanliness, SentimentValue::Neutral)
            .unwrap();
        assert_eq!(resolution, Resolution::Fallback(SentimentValue::Neutral));
    }

    #[test]
    fn test_missing_train_class_is_schema_mismatch() {
        let mut document = OntologyDocument::railway_default();
        document.classes.retain(|c| c.name != TRAIN_CLASS);
        for property in &mut document.data_properties {
            property.domain = None;
        }
        let mut model = SemanticModel::from_document(&document, "inline").unwrap();

        let err = SemanticOverlay::new(&NoopReasoner)
            .resolve(&mut model, 0, Category::Cleanliness, SentimentValue::Positive)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::SchemaMismatch {
                element: SchemaElement::Class,
                ref name
            } if name == "Train"
        ));
        assert!(model.individuals().is_empty());
    }

    #[test]
    fn test_missing_category_property_is_schema_mismatch() {
        let mut document = OntologyDocument::railway_default();
        document.data_properties.retain(|p| p.name != "hasPunctuality");
        let mut model = SemanticModel::from_document(&document, "inline").unwrap();

        let err = SemanticOverlay::new(&NoopReasoner)
            .resolve(&mut model, 0, Category::Punctuality, SentimentValue::Positive)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::SchemaMismatch {
                element: SchemaElement::DataProperty,
                ref name
            } if name == "hasPunctuality"
        ));
    }

    #[test]
    fn test_reused_index_is_rejected() {
        let mut model = default_model();
        let overlay = SemanticOverlay::new(&NoopReasoner);
        overlay
            .resolve(&mut model, 0, Category::Timeliness, SentimentValue::Neutral)
            .unwrap();
        assert!(overlay
            .resolve(&mut model, 0, Category::Timeliness, SentimentValue::Neutral)
            .is_err());
    }
}
