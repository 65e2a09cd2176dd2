//! Condition expressions and conditional trees.
//!
//! Package metadata arrives as a tree whose branches are gated by boolean
//! expressions over flags, target OS, architecture, and compiler. The
//! Condition Evaluator flattens such a tree into one concrete value for a
//! fixed [`Environment`].

use std::collections::BTreeSet;

use semver::VersionReq;
use serde::{Deserialize, Serialize};

use crate::core::dependency::Dependency;
use crate::core::environment::Environment;
use crate::util::Symbol;

/// A boolean expression over the resolution environment.
///
/// Evaluation is pure and total: every expression produces a value for
/// every environment. Unresolvable variables do not exist at this stage;
/// flag references are checked when metadata is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionExpr {
    /// True iff the named flag is in the enabled set
    Flag(Symbol),

    /// True iff the target OS matches
    Os(Symbol),

    /// True iff the target architecture matches
    Arch(Symbol),

    /// True iff the compiler name matches and its version satisfies the range
    Compiler {
        name: Symbol,
        #[serde(default = "wildcard")]
        version: VersionReq,
    },

    /// Negation
    Not(Box<ConditionExpr>),

    /// Conjunction
    And(Box<ConditionExpr>, Box<ConditionExpr>),

    /// Disjunction
    Or(Box<ConditionExpr>, Box<ConditionExpr>),

    /// Constant
    Literal(bool),
}

fn wildcard() -> VersionReq {
    VersionReq::STAR
}

impl ConditionExpr {
    pub fn flag(name: impl Into<Symbol>) -> Self {
        ConditionExpr::Flag(name.into())
    }

    pub fn os(name: impl Into<Symbol>) -> Self {
        ConditionExpr::Os(name.into())
    }

    pub fn arch(name: impl Into<Symbol>) -> Self {
        ConditionExpr::Arch(name.into())
    }

    pub fn compiler(name: impl Into<Symbol>, version: VersionReq) -> Self {
        ConditionExpr::Compiler {
            name: name.into(),
            version,
        }
    }

    pub fn not(inner: ConditionExpr) -> Self {
        ConditionExpr::Not(Box::new(inner))
    }

    pub fn and(lhs: ConditionExpr, rhs: ConditionExpr) -> Self {
        ConditionExpr::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: ConditionExpr, rhs: ConditionExpr) -> Self {
        ConditionExpr::Or(Box::new(lhs), Box::new(rhs))
    }

    /// Evaluate against an environment.
    ///
    /// And/Or evaluate both operands; conditions are pure, so there is
    /// nothing to short-circuit past.
    pub fn eval(&self, env: &Environment) -> bool {
        match self {
            ConditionExpr::Flag(name) => env.has_flag(*name),
            ConditionExpr::Os(os) => *os == env.os(),
            ConditionExpr::Arch(arch) => *arch == env.arch(),
            ConditionExpr::Compiler { name, version } => {
                *name == env.compiler().name && version.matches(&env.compiler().version)
            }
            ConditionExpr::Not(inner) => !inner.eval(env),
            ConditionExpr::And(lhs, rhs) => lhs.eval(env) & rhs.eval(env),
            ConditionExpr::Or(lhs, rhs) => lhs.eval(env) | rhs.eval(env),
            ConditionExpr::Literal(value) => *value,
        }
    }

    /// Collect every flag name referenced by this expression.
    pub fn collect_flags(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            ConditionExpr::Flag(name) => {
                out.insert(*name);
            }
            ConditionExpr::Not(inner) => inner.collect_flags(out),
            ConditionExpr::And(lhs, rhs) | ConditionExpr::Or(lhs, rhs) => {
                lhs.collect_flags(out);
                rhs.collect_flags(out);
            }
            _ => {}
        }
    }
}

/// A value type that can be accumulated while flattening a conditional tree.
///
/// `merge` must be associative with `empty` as its identity. Variants carry
/// an explicit identity rather than leaning on `Default`.
pub trait Mergeable: Sized {
    /// The identity element for `merge`.
    fn empty() -> Self;

    /// Combine two values. Field order follows `self` then `other`.
    fn merge(self, other: Self) -> Self;

    /// Absorb direct dependency declarations attached to a tree node.
    fn push_dependencies(&mut self, deps: &[Dependency]);
}

/// One gated branch of a conditional tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch<T> {
    /// The gate
    pub condition: ConditionExpr,

    /// Subtree taken when the condition holds
    pub then: ConditionNode<T>,

    /// Subtree taken when it does not; absent means the identity
    #[serde(default, rename = "else")]
    pub otherwise: Option<ConditionNode<T>>,
}

/// A node of a conditional metadata tree: a base value, direct dependency
/// declarations, and gated branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionNode<T> {
    /// The unconditional part of this subtree
    #[serde(flatten)]
    pub value: T,

    /// Dependencies declared directly at this node
    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    /// Gated refinements of this subtree
    #[serde(default)]
    pub branches: Vec<Branch<T>>,
}

impl<T> ConditionNode<T> {
    /// A leaf node: just a value, no dependencies, no branches.
    pub fn leaf(value: T) -> Self {
        ConditionNode {
            value,
            dependencies: Vec::new(),
            branches: Vec::new(),
        }
    }

    /// Attach direct dependency declarations.
    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = Dependency>) -> Self {
        self.dependencies.extend(deps);
        self
    }

    /// Attach a gated branch.
    pub fn with_branch(
        mut self,
        condition: ConditionExpr,
        then: ConditionNode<T>,
        otherwise: Option<ConditionNode<T>>,
    ) -> Self {
        self.branches.push(Branch {
            condition,
            then,
            otherwise,
        });
        self
    }

    /// Collect every flag name referenced anywhere in this tree's gates.
    pub fn collect_flags(&self, out: &mut BTreeSet<Symbol>) {
        for branch in &self.branches {
            branch.condition.collect_flags(out);
            branch.then.collect_flags(out);
            if let Some(otherwise) = &branch.otherwise {
                otherwise.collect_flags(out);
            }
        }
    }
}

/// Flatten a conditional tree into one concrete value for `env`.
///
/// The accumulator starts as the node's base value with its direct
/// dependencies absorbed; each branch then contributes the flattening of
/// whichever subtree its condition selects, or the explicit identity when
/// the condition is false and no else-subtree exists. Deterministic:
/// identical (tree, environment) pairs produce identical output.
pub fn flatten<T>(node: &ConditionNode<T>, env: &Environment) -> T
where
    T: Mergeable + Clone,
{
    let mut acc = node.value.clone();
    acc.push_dependencies(&node.dependencies);

    for branch in &node.branches {
        let taken = if branch.condition.eval(env) {
            flatten(&branch.then, env)
        } else if let Some(otherwise) = &branch.otherwise {
            flatten(otherwise, env)
        } else {
            T::empty()
        };
        acc = acc.merge(taken);
    }

    acc
}
