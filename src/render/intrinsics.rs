//! Intrinsic function resolvers.
//!
//! One resolver per CloudFormation tag. Every resolver is idempotent and
//! total: when an input is missing or an argument has the wrong shape the
//! original node is returned untouched, never an error. Argument evaluation
//! is recursive so nested intrinsics resolve bottom-up, and it shares one
//! visit budget with the tree walker so cyclic templates terminate.

use std::cell::Cell;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use cfn_check_yaml::{Node, Scalar};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::render::RenderConfig;
use crate::render::context::InputContext;

/// `${Var}` placeholders in a `!Sub` template. Double colons are permitted
/// so pseudo parameters like `AWS::Region` can appear.
static SUB_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([\w:]+)\}").unwrap());

/// The closed set of CloudFormation intrinsic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Ref,
    Sub,
    Join,
    Select,
    Split,
    GetAtt,
    GetAZs,
    ImportValue,
    Equals,
    If,
    Not,
    And,
    Or,
    Condition,
    FindInMap,
    Base64,
    ToJsonString,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 17] = [
        Intrinsic::Ref,
        Intrinsic::Sub,
        Intrinsic::Join,
        Intrinsic::Select,
        Intrinsic::Split,
        Intrinsic::GetAtt,
        Intrinsic::GetAZs,
        Intrinsic::ImportValue,
        Intrinsic::Equals,
        Intrinsic::If,
        Intrinsic::Not,
        Intrinsic::And,
        Intrinsic::Or,
        Intrinsic::Condition,
        Intrinsic::FindInMap,
        Intrinsic::Base64,
        Intrinsic::ToJsonString,
    ];

    /// The tag name as written in templates, without the bang.
    pub fn tag(&self) -> &'static str {
        match self {
            Intrinsic::Ref => "Ref",
            Intrinsic::Sub => "Sub",
            Intrinsic::Join => "Join",
            Intrinsic::Select => "Select",
            Intrinsic::Split => "Split",
            Intrinsic::GetAtt => "GetAtt",
            Intrinsic::GetAZs => "GetAZs",
            Intrinsic::ImportValue => "ImportValue",
            Intrinsic::Equals => "Equals",
            Intrinsic::If => "If",
            Intrinsic::Not => "Not",
            Intrinsic::And => "And",
            Intrinsic::Or => "Or",
            Intrinsic::Condition => "Condition",
            Intrinsic::FindInMap => "FindInMap",
            Intrinsic::Base64 => "Base64",
            Intrinsic::ToJsonString => "ToJsonString",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().find(|intrinsic| intrinsic.tag() == tag).copied()
    }
}

/// Mutually recursive conditions recurse through argument evaluation; the
/// visit budget bounds total work while this bounds call-stack depth.
const MAX_RESOLVE_DEPTH: usize = 64;

/// Resolves intrinsic invocations against an input context.
pub struct Resolver<'a> {
    ctx: &'a InputContext,
    config: &'a RenderConfig,
    visits: Cell<usize>,
    depth: Cell<usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(ctx: &'a InputContext, config: &'a RenderConfig) -> Self {
        Self {
            ctx,
            config,
            visits: Cell::new(config.visit_budget),
            depth: Cell::new(0),
        }
    }

    /// Consumes one unit of the visit budget; false once exhausted.
    pub fn charge(&self) -> bool {
        let remaining = self.visits.get();
        if remaining == 0 {
            return false;
        }
        self.visits.set(remaining - 1);
        true
    }

    pub fn budget_exhausted(&self) -> bool {
        self.visits.get() == 0
    }

    /// Resolves one tagged node. `None` means "leave it unchanged".
    pub fn resolve(&self, root: &Node, node: &Node) -> Option<Node> {
        let tag = node.tag()?;
        if !self.config.recognizes(tag) {
            return None;
        }
        let intrinsic = Intrinsic::from_tag(tag)?;
        if !self.charge() {
            return None;
        }
        let argument = node.untagged();
        match intrinsic {
            Intrinsic::Ref => self.eval_ref(root, &argument),
            Intrinsic::Sub => self.eval_sub(root, &argument),
            Intrinsic::Join => self.eval_join(root, &argument),
            Intrinsic::Select => self.eval_select(root, &argument),
            Intrinsic::Split => self.eval_split(root, &argument),
            Intrinsic::GetAtt => self.eval_get_att(root, &argument),
            Intrinsic::GetAZs => self.eval_get_azs(),
            Intrinsic::ImportValue => self.eval_import_value(root, &argument),
            Intrinsic::Equals => self.eval_equals(root, &argument),
            Intrinsic::If => self.eval_if(root, &argument),
            Intrinsic::Not => self.eval_not(root, &argument),
            Intrinsic::And => self.eval_and(root, &argument),
            Intrinsic::Or => self.eval_or(root, &argument),
            Intrinsic::Condition => self.eval_condition(root, &argument),
            Intrinsic::FindInMap => self.eval_find_in_map(root, &argument),
            Intrinsic::Base64 => self.eval_base64(root, &argument),
            Intrinsic::ToJsonString => self.eval_to_json_string(root, &argument),
        }
    }

    /// Fully resolves a subtree for use as an argument: tagged nodes are
    /// evaluated, containers are rebuilt from resolved children. Anything
    /// that cannot resolve comes back as-is.
    pub fn resolve_fully(&self, root: &Node, node: &Node) -> Node {
        let depth = self.depth.get();
        if self.budget_exhausted() || depth >= MAX_RESOLVE_DEPTH {
            return node.clone();
        }
        self.depth.set(depth + 1);
        let resolved = self.resolve_step(root, node);
        self.depth.set(depth);
        resolved
    }

    fn resolve_step(&self, root: &Node, node: &Node) -> Node {
        if node.is_tagged() {
            return match self.resolve(root, node) {
                Some(resolved) if resolved != *node => self.resolve_fully(root, &resolved),
                Some(resolved) => resolved,
                None => node.clone(),
            };
        }
        match node {
            Node::Mapping(mapping) => Node::Mapping(
                mapping
                    .iter()
                    .map(|(key, value)| (key.clone(), self.resolve_fully(root, value)))
                    .collect(),
            ),
            Node::Sequence(sequence) => Node::Sequence(
                sequence
                    .items
                    .iter()
                    .map(|item| self.resolve_fully(root, item))
                    .collect(),
            ),
            scalar => scalar.clone(),
        }
    }

    fn eval_ref(&self, root: &Node, argument: &Node) -> Option<Node> {
        let name = argument.as_str()?;
        if let Some(value) = self.ctx.parameters.get(name) {
            return Some(Node::Scalar(value.clone()));
        }
        if let Some(value) = self.ctx.parameter_defaults.get(name) {
            return Some(Node::Scalar(value.clone()));
        }
        // A declared parameter without a value stays symbolic.
        if self.ctx.parameter_names.contains(name) {
            return None;
        }
        // A logical ID acts as its own reference.
        if self.ctx.resources.contains_key(name) {
            return Some(Node::string(name));
        }
        if let Some(value) = self.ctx.references.get(name) {
            return Some(Node::Scalar(value.clone()));
        }
        root.find_first(name).cloned()
    }

    fn eval_sub(&self, root: &Node, argument: &Node) -> Option<Node> {
        let (template, variables) = match argument {
            Node::Scalar(Scalar::String(template)) => (template.clone(), IndexMap::new()),
            Node::Sequence(sequence) if sequence.len() == 2 => {
                let template = self
                    .resolve_fully(root, &sequence.items[0])
                    .as_str()?
                    .to_string();
                let resolved = self.resolve_fully(root, &sequence.items[1]);
                let mapping = resolved.as_mapping()?;
                let mut variables = IndexMap::new();
                for (name, value) in mapping.iter() {
                    if let Some(text) = value.scalar_string() {
                        variables.insert(name.clone(), text);
                    }
                }
                (template, variables)
            }
            _ => return None,
        };

        let substituted = SUB_PLACEHOLDER.replace_all(&template, |caps: &regex::Captures| {
            let name = &caps[1];
            if let Some(value) = variables.get(name) {
                return value.clone();
            }
            if let Some(value) = self.ctx.references.get(name) {
                return value.to_string();
            }
            if let Some(value) = self.ctx.parameters.get(name) {
                return value.to_string();
            }
            if let Some(value) = self.ctx.parameter_defaults.get(name) {
                return value.to_string();
            }
            // No binding anywhere: the placeholder stays literal.
            caps[0].to_string()
        });
        Some(Node::string(substituted.into_owned()))
    }

    fn eval_get_att(&self, root: &Node, argument: &Node) -> Option<Node> {
        let steps: Vec<String> = match argument {
            Node::Scalar(Scalar::String(dotted)) => {
                dotted.split('.').map(str::to_string).collect()
            }
            Node::Sequence(sequence) => sequence
                .items
                .iter()
                .map(|step| self.resolve_fully(root, step).scalar_string())
                .collect::<Option<Vec<_>>>()?,
            _ => return None,
        };
        if steps.is_empty() {
            return None;
        }

        let joined = steps.join(".");
        if let Some(value) = self.ctx.attributes.get(&joined) {
            return Some(value.clone());
        }

        let mut steps = steps.iter();
        let first = steps.next()?;
        if first == "Value" {
            return Some(Node::Mapping(self.ctx.resources.clone()));
        }
        let mut current = self.ctx.resources.get(first)?;
        for step in steps {
            if step == "Value" {
                return Some(current.clone());
            }
            current = match current {
                Node::Mapping(mapping) => mapping.get(step)?,
                Node::Sequence(sequence) => sequence.get(step.parse().ok()?)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }

    fn eval_find_in_map(&self, root: &Node, argument: &Node) -> Option<Node> {
        let sequence = argument.as_sequence()?;
        if sequence.len() != 3 {
            return None;
        }
        let resolved: Vec<Node> = sequence
            .items
            .iter()
            .map(|item| self.resolve_fully(root, item))
            .collect();

        let map_name = resolved[0].scalar_string()?;
        let mapping = self.ctx.mappings.get(&map_name)?.as_mapping()?;
        // An unresolvable top-level key falls back to the user's choice for
        // this mapping.
        let top = resolved[1]
            .scalar_string()
            .and_then(|key| mapping.get(&key))
            .or_else(|| {
                let chosen = self.ctx.selected_mappings.get(&map_name)?;
                mapping.get(chosen)
            })?;
        let second_key = resolved[2].scalar_string()?;
        top.as_mapping()?.get(&second_key).cloned()
    }

    fn eval_join(&self, root: &Node, argument: &Node) -> Option<Node> {
        let sequence = argument.as_sequence()?;
        if sequence.len() != 2 {
            return None;
        }
        let delimiter = self.resolve_fully(root, &sequence.items[0]).scalar_string()?;
        let items = self.resolve_fully(root, &sequence.items[1]);
        if items.is_tagged() {
            return None;
        }
        let items = items.as_sequence()?;
        let mut pieces = Vec::with_capacity(items.len());
        for item in &items.items {
            pieces.push(item.scalar_string()?);
        }
        Some(Node::string(pieces.join(&delimiter)))
    }

    fn eval_split(&self, root: &Node, argument: &Node) -> Option<Node> {
        let sequence = argument.as_sequence()?;
        if sequence.len() != 2 {
            return None;
        }
        let delimiter = self.resolve_fully(root, &sequence.items[0]).scalar_string()?;
        let source = self.resolve_fully(root, &sequence.items[1]).scalar_string()?;
        let pieces = source.split(delimiter.as_str()).map(Node::string).collect();
        Some(Node::Sequence(pieces))
    }

    fn eval_select(&self, root: &Node, argument: &Node) -> Option<Node> {
        let sequence = argument.as_sequence()?;
        if sequence.len() != 2 {
            return None;
        }
        let index = match self.resolve_fully(root, &sequence.items[0]).as_scalar()? {
            Scalar::Int(i) if *i >= 0 => *i as usize,
            Scalar::String(s) => s.parse().ok()?,
            _ => return None,
        };
        let list = self.resolve_fully(root, &sequence.items[1]);
        if list.is_tagged() {
            return None;
        }
        list.as_sequence()?.get(index).cloned()
    }

    fn eval_base64(&self, root: &Node, argument: &Node) -> Option<Node> {
        let text = self.resolve_fully(root, argument).scalar_string()?;
        Some(Node::string(BASE64.encode(text.as_bytes())))
    }

    fn eval_to_json_string(&self, root: &Node, argument: &Node) -> Option<Node> {
        let resolved = self.resolve_fully(root, argument);
        if resolved.contains_tag() {
            return None;
        }
        serde_json::to_string(&json_from_node(&resolved))
            .ok()
            .map(Node::string)
    }

    fn eval_equals(&self, root: &Node, argument: &Node) -> Option<Node> {
        let sequence = argument.as_sequence()?;
        if sequence.len() != 2 {
            return None;
        }
        let a = self.resolve_fully(root, &sequence.items[0]);
        let b = self.resolve_fully(root, &sequence.items[1]);
        if a.contains_tag() || b.contains_tag() {
            return None;
        }
        // CloudFormation compares stringly, so template `3` equals CLI "3".
        let equal = match (a.as_scalar(), b.as_scalar()) {
            (Some(x), Some(y)) => x.to_string() == y.to_string(),
            _ => a == b,
        };
        Some(Node::from(equal))
    }

    /// Evaluates a named entry of the Conditions block down to a boolean.
    fn condition_value(&self, root: &Node, name: &str) -> Option<bool> {
        let condition = self.ctx.conditions.get(name)?;
        self.resolve_fully(root, condition).as_scalar()?.as_bool()
    }

    fn eval_if(&self, root: &Node, argument: &Node) -> Option<Node> {
        let sequence = argument.as_sequence()?;
        if sequence.len() != 3 {
            return None;
        }
        let name = sequence.items[0].as_str()?;
        let branch = if self.condition_value(root, name)? {
            &sequence.items[1]
        } else {
            &sequence.items[2]
        };
        Some(self.resolve_fully(root, branch))
    }

    fn eval_condition(&self, root: &Node, argument: &Node) -> Option<Node> {
        let name = argument.as_str()?;
        self.condition_value(root, name).map(Node::from)
    }

    fn eval_bools(&self, root: &Node, argument: &Node) -> Option<Vec<bool>> {
        let sequence = argument.as_sequence()?;
        if sequence.is_empty() {
            return None;
        }
        sequence
            .items
            .iter()
            .map(|item| {
                self.resolve_fully(root, item)
                    .as_scalar()
                    .and_then(Scalar::as_bool)
            })
            .collect()
    }

    fn eval_and(&self, root: &Node, argument: &Node) -> Option<Node> {
        let values = self.eval_bools(root, argument)?;
        Some(Node::from(values.iter().all(|v| *v)))
    }

    fn eval_or(&self, root: &Node, argument: &Node) -> Option<Node> {
        let values = self.eval_bools(root, argument)?;
        Some(Node::from(values.iter().any(|v| *v)))
    }

    fn eval_not(&self, root: &Node, argument: &Node) -> Option<Node> {
        match self.eval_bools(root, argument)?.as_slice() {
            [value] => Some(Node::from(!value)),
            _ => None,
        }
    }

    fn eval_import_value(&self, root: &Node, argument: &Node) -> Option<Node> {
        let name = self.resolve_fully(root, argument).scalar_string()?;
        for (export_key, document) in self.ctx.import_values.values() {
            if export_key == &name {
                if let Some(found) = document.root().find_first(&name) {
                    return Some(found.clone());
                }
            }
        }
        None
    }

    fn eval_get_azs(&self) -> Option<Node> {
        if self.ctx.availability_zones.is_empty() {
            return None;
        }
        Some(Node::Sequence(
            self.ctx
                .availability_zones
                .iter()
                .map(Node::string)
                .collect(),
        ))
    }
}

fn json_from_node(node: &Node) -> serde_json::Value {
    match node {
        Node::Scalar(Scalar::Null) => serde_json::Value::Null,
        Node::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
        Node::Scalar(Scalar::Int(i)) => serde_json::Value::from(*i),
        Node::Scalar(Scalar::Float(x)) => {
            serde_json::Number::from_f64(*x).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        Node::Scalar(Scalar::String(s)) => serde_json::Value::String(s.clone()),
        // Tagged nodes are rejected before serialization; treat the payload
        // as its untagged shape if one slips through.
        Node::TaggedScalar { value, .. } => json_from_node(&Node::Scalar(value.clone())),
        Node::Mapping(mapping) => serde_json::Value::Object(
            mapping
                .iter()
                .map(|(key, value)| (key.clone(), json_from_node(value)))
                .collect(),
        ),
        Node::Sequence(sequence) => {
            serde_json::Value::Array(sequence.items.iter().map(json_from_node).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use cfn_check_yaml::{Document, node_from_yaml};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::render::context::RenderInputs;

    fn parse(text: &str) -> Node {
        node_from_yaml(serde_yaml::from_str(text).unwrap())
    }

    fn resolve_in(template: &str, inputs: RenderInputs, expression: &str) -> Option<Node> {
        let document = Document::parse(template).unwrap();
        let ctx = InputContext::build(document.root(), inputs);
        let config = RenderConfig::default();
        let resolver = Resolver::new(&ctx, &config);
        resolver.resolve(document.root(), &parse(expression))
    }

    fn resolve(template: &str, expression: &str) -> Option<Node> {
        resolve_in(template, RenderInputs::default(), expression)
    }

    #[test]
    fn test_ref_parameter_override_beats_default() {
        let mut inputs = RenderInputs::default();
        inputs.parameters.insert("Env".into(), "stage".into());
        let resolved = resolve_in(
            "Parameters:\n  Env:\n    Default: prod\n",
            inputs,
            "!Ref Env",
        );
        assert_eq!(resolved, Some(Node::string("stage")));
    }

    #[test]
    fn test_ref_parameter_default() {
        let resolved = resolve("Parameters:\n  Env:\n    Default: prod\n", "!Ref Env");
        assert_eq!(resolved, Some(Node::string("prod")));
    }

    #[test]
    fn test_ref_declared_parameter_without_value_stays_symbolic() {
        let resolved = resolve("Parameters:\n  Env:\n    Type: String\n", "!Ref Env");
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_ref_logical_id_is_its_own_reference() {
        let resolved = resolve("Resources:\n  Api:\n    Type: T\n", "!Ref Api");
        assert_eq!(resolved, Some(Node::string("Api")));
    }

    #[test]
    fn test_ref_references_input() {
        let mut inputs = RenderInputs::default();
        inputs.references.insert("VpcId".into(), "vpc-123".into());
        let resolved = resolve_in("Resources: {}\n", inputs, "!Ref VpcId");
        assert_eq!(resolved, Some(Node::string("vpc-123")));
    }

    #[test]
    fn test_ref_falls_back_to_first_document_entry() {
        let resolved = resolve("Globals:\n  TableName: users\n", "!Ref TableName");
        assert_eq!(resolved, Some(Node::string("users")));
    }

    #[test]
    fn test_ref_unknown_name_unchanged() {
        assert_eq!(resolve("Resources: {}\n", "!Ref Nowhere"), None);
    }

    #[test]
    fn test_sub_explicit_variables() {
        let resolved = resolve("{}", "!Sub [\"${A}/${B}\", {A: alpha, B: beta}]");
        assert_eq!(resolved, Some(Node::string("alpha/beta")));
    }

    #[test]
    fn test_sub_parameter_default_and_literal_leftover() {
        let resolved = resolve(
            "Parameters:\n  Env:\n    Default: prod\n",
            "!Sub \"${Env}-${Missing}\"",
        );
        assert_eq!(resolved, Some(Node::string("prod-${Missing}")));
    }

    #[test]
    fn test_sub_pseudo_parameter_via_references() {
        let mut inputs = RenderInputs::default();
        inputs
            .references
            .insert("AWS::Region".into(), "us-east-1".into());
        let resolved = resolve_in("{}", inputs, "!Sub \"${AWS::Region}-svc\"");
        assert_eq!(resolved, Some(Node::string("us-east-1-svc")));
    }

    #[test]
    fn test_get_att_override() {
        let mut inputs = RenderInputs::default();
        inputs
            .attributes
            .insert("Role.Arn".into(), "arn:aws:iam::123:role/R".into());
        let resolved = resolve_in("Resources: {}\n", inputs, "!GetAtt Role.Arn");
        assert_eq!(resolved, Some(Node::string("arn:aws:iam::123:role/R")));
    }

    #[test]
    fn test_get_att_walks_resources() {
        let template = "Resources:\n  Api:\n    Properties:\n      Stages:\n        - Name: v1\n";
        let resolved = resolve(template, "!GetAtt Api.Properties.Stages.0.Name");
        assert_eq!(resolved, Some(Node::string("v1")));
    }

    #[test]
    fn test_get_att_value_step_terminates() {
        let template = "Resources:\n  Api:\n    Type: T\n";
        let resolved = resolve(template, "!GetAtt [Api, Value]");
        assert_eq!(resolved, Some(parse("Type: T")));
    }

    #[test]
    fn test_get_att_missing_step_unchanged() {
        assert_eq!(
            resolve("Resources:\n  Api:\n    Type: T\n", "!GetAtt Api.Arn"),
            None
        );
    }

    #[test]
    fn test_find_in_map() {
        let template = "Mappings:\n  Region:\n    us-east-1:\n      ami: ami-1\n    us-west-2:\n      ami: ami-2\n";
        let resolved = resolve(template, "!FindInMap [Region, us-east-1, ami]");
        assert_eq!(resolved, Some(Node::string("ami-1")));
    }

    #[test]
    fn test_find_in_map_selected_mapping_fallback() {
        let template = "Mappings:\n  Region:\n    us-east-1:\n      ami: ami-1\n";
        let mut inputs = RenderInputs::default();
        inputs
            .selected_mappings
            .insert("Region".into(), "us-east-1".into());
        let resolved = resolve_in(template, inputs, "!FindInMap [Region, !Ref 'AWS::Region', ami]");
        assert_eq!(resolved, Some(Node::string("ami-1")));
    }

    #[test]
    fn test_find_in_map_missing_key_unchanged() {
        let template = "Mappings:\n  Region:\n    us-east-1:\n      ami: ami-1\n";
        assert_eq!(resolve(template, "!FindInMap [Region, eu-west-1, ami]"), None);
    }

    #[test]
    fn test_join_resolves_nested_intrinsics() {
        let template = "Parameters:\n  Env:\n    Default: stage\n";
        let resolved = resolve(template, "!Join ['-', [!Ref Env, svc]]");
        assert_eq!(resolved, Some(Node::string("stage-svc")));
    }

    #[test]
    fn test_join_with_unresolvable_item_unchanged() {
        let resolved = resolve("{}", "!Join ['-', [!Ref Missing, svc]]");
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_split_and_select() {
        let resolved = resolve("{}", "!Split [',', 'a,b,c']");
        assert_eq!(resolved, Some(parse("[a, b, c]")));

        let resolved = resolve("{}", "!Select [1, [a, b, c]]");
        assert_eq!(resolved, Some(Node::string("b")));
    }

    #[test]
    fn test_select_out_of_range_unchanged() {
        assert_eq!(resolve("{}", "!Select [9, [a, b]]"), None);
    }

    #[test]
    fn test_select_over_split() {
        let resolved = resolve("{}", "!Select [2, !Split [',', 'a,b,c']]");
        assert_eq!(resolved, Some(Node::string("c")));
    }

    #[test]
    fn test_base64() {
        let resolved = resolve("{}", "!Base64 'hello world'");
        assert_eq!(resolved, Some(Node::string("aGVsbG8gd29ybGQ=")));
    }

    #[test]
    fn test_to_json_string_preserves_order() {
        let resolved = resolve("{}", "!ToJsonString {z: 1, a: two}");
        assert_eq!(resolved, Some(Node::string(r#"{"z":1,"a":"two"}"#)));
    }

    #[test]
    fn test_to_json_string_with_unresolved_child_unchanged() {
        assert_eq!(resolve("{}", "!ToJsonString {key: !Ref Missing}"), None);
    }

    #[test]
    fn test_equals_compares_stringly() {
        let resolved = resolve("{}", "!Equals ['3', 3]");
        assert_eq!(resolved, Some(Node::from(true)));

        let resolved = resolve("{}", "!Equals [a, b]");
        assert_eq!(resolved, Some(Node::from(false)));
    }

    #[test]
    fn test_condition_chain() {
        let template = "Parameters:\n  Env:\n    Default: prod\nConditions:\n  IsProd: !Equals [!Ref Env, prod]\n";
        let resolved = resolve(template, "!If [IsProd, a, b]");
        assert_eq!(resolved, Some(Node::string("a")));

        let mut inputs = RenderInputs::default();
        inputs.parameters.insert("Env".into(), "dev".into());
        let resolved = resolve_in(template, inputs, "!If [IsProd, a, b]");
        assert_eq!(resolved, Some(Node::string("b")));

        let resolved = resolve(template, "!Condition IsProd");
        assert_eq!(resolved, Some(Node::from(true)));
    }

    #[test]
    fn test_boolean_operators() {
        let template = "Conditions:\n  Yes1: !Equals [a, a]\n  No1: !Equals [a, b]\n";
        assert_eq!(
            resolve(template, "!And [!Condition Yes1, !Condition No1]"),
            Some(Node::from(false))
        );
        assert_eq!(
            resolve(template, "!Or [!Condition Yes1, !Condition No1]"),
            Some(Node::from(true))
        );
        assert_eq!(
            resolve(template, "!Not [!Condition No1]"),
            Some(Node::from(true))
        );
    }

    #[test]
    fn test_boolean_operator_with_non_boolean_unchanged() {
        assert_eq!(resolve("{}", "!And [maybe, perhaps]"), None);
    }

    #[test]
    fn test_get_azs() {
        let mut inputs = RenderInputs::default();
        inputs.availability_zones = vec!["us-east-1a".into(), "us-east-1b".into()];
        let resolved = resolve_in("{}", inputs, "!GetAZs us-east-1");
        assert_eq!(resolved, Some(parse("[us-east-1a, us-east-1b]")));

        assert_eq!(resolve("{}", "!GetAZs us-east-1"), None);
    }

    #[test]
    fn test_import_value() {
        let exports = Document::parse("NetworkStackVpc: vpc-abc\n").unwrap();
        let mut inputs = RenderInputs::default();
        inputs
            .import_values
            .insert("exports.yml".into(), ("NetworkStackVpc".into(), exports));
        let resolved = resolve_in("{}", inputs, "!ImportValue NetworkStackVpc");
        assert_eq!(resolved, Some(Node::string("vpc-abc")));

        assert_eq!(resolve("{}", "!ImportValue NetworkStackVpc"), None);
    }

    #[test]
    fn test_unknown_tag_left_alone() {
        assert_eq!(resolve("{}", "!Mystery payload"), None);
    }
}
