//! Semantic model backing the sentiment overlay.
//!
//! An ontology is declared in TOML (classes, integer data properties and
//! optional inference rules) and loaded into a [`SemanticModel`] that holds
//! the individuals asserted during one analysis run. Runs acquire a model
//! through [`OntologySource::open`]; the returned [`OntologySession`] owns it
//! and releases it when dropped.

use crate::domain::model::Category;
use crate::utils::error::{AnalysisError, ResourceKind, Result, SchemaElement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TRAIN_CLASS: &str = "Train";
pub const SENTIMENT_CLASS: &str = "Sentiment";
pub const SENTIMENT_PROPERTY: &str = "hasSentiment";
pub const DEFAULT_IRI: &str = "http://example.org/railway-sentiment.owl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyDocument {
    pub ontology: OntologyHeader,
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    #[serde(default)]
    pub data_properties: Vec<DataPropertyDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyHeader {
    pub iri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPropertyDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// `when` 全部成立時，對個體斷言 `then`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub when: Vec<ConditionDecl>,
    pub then: AssertionDecl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDecl {
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertionDecl {
    pub property: String,
    pub value: i64,
}

impl OntologyDocument {
    /// 鐵路情緒本體論：Train、Sentiment、五個分類屬性與 hasSentiment，不含規則
    pub fn railway_default() -> Self {
        let mut data_properties: Vec<DataPropertyDecl> = Category::ALL
            .iter()
            .map(|category| DataPropertyDecl {
                name: category.property_name().to_string(),
                domain: Some(TRAIN_CLASS.to_string()),
            })
            .collect();
        data_properties.push(DataPropertyDecl {
            name: SENTIMENT_PROPERTY.to_string(),
            domain: Some(TRAIN_CLASS.to_string()),
        });

        Self {
            ontology: OntologyHeader {
                iri: DEFAULT_IRI.to_string(),
                version: Some("1.0".to_string()),
            },
            classes: vec![
                ClassDecl {
                    name: TRAIN_CLASS.to_string(),
                    parent: None,
                },
                ClassDecl {
                    name: SENTIMENT_CLASS.to_string(),
                    parent: None,
                },
            ],
            data_properties,
            rules: Vec::new(),
        }
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AnalysisError::MalformedResource {
            resource: ResourceKind::Ontology,
            path: origin.to_string(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AnalysisError::ProcessingError {
            message: format!("Failed to serialize ontology: {}", e),
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndividualId(usize);

#[derive(Debug, Clone)]
pub struct Individual {
    name: String,
    class: ClassId,
    values: HashMap<PropertyId, Vec<i64>>,
}

impl Individual {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn values(&self, property: PropertyId) -> &[i64] {
        self.values.get(&property).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub property: PropertyId,
    pub equals: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Condition {
    pub fn matches(&self, value: i64) -> bool {
        self.equals.map_or(true, |v| value == v)
            && self.min.map_or(true, |v| value >= v)
            && self.max.map_or(true, |v| value <= v)
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub class: Option<ClassId>,
    pub conditions: Vec<Condition>,
    pub then_property: PropertyId,
    pub then_value: i64,
}

#[derive(Debug)]
pub struct SemanticModel {
    iri: String,
    source: String,
    classes: Vec<String>,
    parents: Vec<Option<ClassId>>,
    class_index: HashMap<String, ClassId>,
    properties: Vec<String>,
    property_index: HashMap<String, PropertyId>,
    rules: Vec<Rule>,
    individuals: Vec<Individual>,
    individual_index: HashMap<String, IndividualId>,
}

impl SemanticModel {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let resolved = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let origin = resolved.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|e| {
            tracing::debug!("Failed to read ontology {}: {}", origin, e);
            AnalysisError::ResourceMissing {
                resource: ResourceKind::Ontology,
                path: origin.clone(),
            }
        })?;

        let document = OntologyDocument::from_toml_str(&content, &origin)?;
        Self::from_document(&document, origin)
    }

    pub fn from_document(document: &OntologyDocument, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let malformed = |reason: String| AnalysisError::MalformedResource {
            resource: ResourceKind::Ontology,
            path: source.clone(),
            reason,
        };

        let mut classes = Vec::new();
        let mut class_index = HashMap::new();
        for decl in &document.classes {
            let id = ClassId(classes.len());
            if class_index.insert(decl.name.clone(), id).is_some() {
                return Err(malformed(format!("class '{}' declared twice", decl.name)));
            }
            classes.push(decl.name.clone());
        }

        let lookup_class = |name: &str| -> Result<ClassId> {
            class_index
                .get(name)
                .copied()
                .ok_or_else(|| AnalysisError::SchemaMismatch {
                    element: SchemaElement::Class,
                    name: name.to_string(),
                })
        };

        let mut parents = Vec::with_capacity(classes.len());
        for decl in &document.classes {
            parents.push(decl.parent.as_deref().map(lookup_class).transpose()?);
        }

        // 父類別鏈不可成環，否則 is_a 與推論都走不完
        for (start, name) in classes.iter().enumerate() {
            let mut current = parents[start];
            let mut steps = 0;
            while let Some(id) = current {
                steps += 1;
                if id.0 == start || steps > classes.len() {
                    return Err(malformed(format!("parent chain of class '{}' forms a cycle", name)));
                }
                current = parents[id.0];
            }
        }

        let mut properties = Vec::new();
        let mut property_index = HashMap::new();
        for decl in &document.data_properties {
            if let Some(domain) = &decl.domain {
                lookup_class(domain)?;
            }
            let id = PropertyId(properties.len());
            if property_index.insert(decl.name.clone(), id).is_some() {
                return Err(malformed(format!("data property '{}' declared twice", decl.name)));
            }
            properties.push(decl.name.clone());
        }

        let lookup_property = |name: &str| -> Result<PropertyId> {
            property_index
                .get(name)
                .copied()
                .ok_or_else(|| AnalysisError::SchemaMismatch {
                    element: SchemaElement::DataProperty,
                    name: name.to_string(),
                })
        };

        let mut rules = Vec::with_capacity(document.rules.len());
        for decl in &document.rules {
            let conditions = decl
                .when
                .iter()
                .map(|c| {
                    Ok(Condition {
                        property: lookup_property(&c.property)?,
                        equals: c.equals,
                        min: c.min,
                        max: c.max,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            if conditions.is_empty() {
                return Err(malformed(format!("rule '{}' has no conditions", decl.name)));
            }

            rules.push(Rule {
                name: decl.name.clone(),
                class: decl.class.as_deref().map(lookup_class).transpose()?,
                conditions,
                then_property: lookup_property(&decl.then.property)?,
                then_value: decl.then.value,
            });
        }

        Ok(Self {
            iri: document.ontology.iri.clone(),
            source,
            classes,
            parents,
            class_index,
            properties,
            property_index,
            rules,
            individuals: Vec::new(),
            individual_index: HashMap::new(),
        })
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn class(&self, name: &str) -> Option<ClassId> {
        self.class_index.get(name).copied()
    }

    pub fn class_name(&self, id: ClassId) -> &str {
        &self.classes[id.0]
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// `class` 本身或其任一祖先為 `ancestor`
    pub fn is_a(&self, class: ClassId, ancestor: ClassId) -> bool {
        let mut current = Some(class);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parents[id.0];
        }
        false
    }

    pub fn data_property(&self, name: &str) -> Option<PropertyId> {
        self.property_index.get(name).copied()
    }

    pub fn property_name(&self, id: PropertyId) -> &str {
        &self.properties[id.0]
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn iter_individuals(&self) -> impl Iterator<Item = (IndividualId, &Individual)> {
        self.individuals
            .iter()
            .enumerate()
            .map(|(index, individual)| (IndividualId(index), individual))
    }

    pub fn individual(&self, id: IndividualId) -> &Individual {
        &self.individuals[id.0]
    }

    pub fn find_individual(&self, name: &str) -> Option<IndividualId> {
        self.individual_index.get(name).copied()
    }

    pub fn create_individual(&mut self, class: ClassId, name: impl Into<String>) -> Result<IndividualId> {
        let name = name.into();
        if self.individual_index.contains_key(&name) {
            return Err(AnalysisError::ProcessingError {
                message: format!("individual '{}' already exists in {}", name, self.iri),
            });
        }

        let id = IndividualId(self.individuals.len());
        self.individual_index.insert(name.clone(), id);
        self.individuals.push(Individual {
            name,
            class,
            values: HashMap::new(),
        });
        Ok(id)
    }

    /// 以新值整批取代該屬性原有的值
    pub fn set_data_property(&mut self, individual: IndividualId, property: PropertyId, values: Vec<i64>) {
        self.individuals[individual.0].values.insert(property, values);
    }

    /// 值不存在時才加入；回傳是否新增
    pub fn assert_data_value(&mut self, individual: IndividualId, property: PropertyId, value: i64) -> bool {
        let values = self.individuals[individual.0]
            .values
            .entry(property)
            .or_default();
        if values.contains(&value) {
            false
        } else {
            values.push(value);
            true
        }
    }

    pub fn data_values(&self, individual: IndividualId, property: PropertyId) -> &[i64] {
        self.individuals[individual.0].values(property)
    }

    pub fn rule_applies(&self, rule: &Rule, individual: &Individual) -> bool {
        if let Some(class) = rule.class {
            if !self.is_a(individual.class, class) {
                return false;
            }
        }
        rule.conditions
            .iter()
            .all(|c| individual.values(c.property).iter().any(|v| c.matches(*v)))
    }
}

/// 本體論檔案來源；每次分析各自開啟一份私有模型
#[derive(Debug, Clone)]
pub struct OntologySource {
    path: PathBuf,
    live: Arc<AtomicUsize>,
}

impl OntologySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> Result<OntologySession> {
        let model = SemanticModel::load(&self.path)?;
        self.live.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            "🔗 Opened semantic model {} from {} ({} classes, {} properties, {} rules)",
            model.iri(),
            model.source(),
            model.class_count(),
            model.property_count(),
            model.rules().len()
        );
        Ok(OntologySession {
            model,
            live: Arc::clone(&self.live),
        })
    }

    /// 尚未釋放的 session 數量
    pub fn live_sessions(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

pub struct OntologySession {
    model: SemanticModel,
    live: Arc<AtomicUsize>,
}

impl OntologySession {
    pub fn model(&self) -> &SemanticModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut SemanticModel {
        &mut self.model
    }
}

impl Drop for OntologySession {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(
            "🧹 Released semantic model {} ({} individuals)",
            self.model.iri(),
            self.model.individuals().len()
        );
    }
}
