//! Logical schema of the orchestrated namespace.
//!
//! All state lives in a flat namespace of slash-delimited keys whose segment
//! positions are fixed:
//!
//! ```text
//! cns/{network}/name
//! cns/{network}/orchestrator
//! cns/{network}/profiles/{profile}/versions/version{V}/properties/{p}/provider
//! cns/{network}/nodes/{node}/name
//! cns/{network}/nodes/{node}/contexts/{ctx}/name
//! cns/{network}/nodes/{node}/contexts/{ctx}/{role}/{profile}/version
//! cns/{network}/nodes/{node}/contexts/{ctx}/{role}/{profile}/scope
//! cns/{network}/nodes/{node}/contexts/{ctx}/{role}/{profile}/properties/{p}
//! cns/{network}/nodes/{node}/contexts/{ctx}/{role}/{profile}/connections/{id}/{opposite}
//! cns/{network}/nodes/{node}/contexts/{ctx}/{role}/{profile}/connections/{id}/properties/{p}
//! ```
//!
//! Roles and orchestrator modes are parsed into sum types once at cache-read
//! time; the raw strings never travel further than this module.

use std::fmt;

/// Fixed positions of the path segments referenced by the engine.
pub mod segment {
    pub const ROOT: usize = 0;
    pub const NETWORK: usize = 1;
    /// `orchestrator` | `profiles` | `nodes`.
    pub const KIND: usize = 2;
    pub const NODE: usize = 3;
    pub const CONTEXT: usize = 5;
    pub const ROLE: usize = 6;
    pub const PROFILE: usize = 7;
    /// `version` | `scope` | `properties` | `connections`.
    pub const CAPABILITY: usize = 8;
    /// Capability-level property name.
    pub const PROPERTY: usize = 9;
    /// Connection id; shares the position of the capability property name.
    pub const CONNECTION_ID: usize = 9;
    /// `properties` or the opposite-role link under a connection.
    pub const CONNECTION_SUB: usize = 10;
    /// Connection-level property name.
    pub const CONNECTION_PROPERTY: usize = 11;
}

/// The two sides of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Provider,
    Consumer,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "provider" => Some(Role::Provider),
            "consumer" => Some(Role::Consumer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Provider => "provider",
            Role::Consumer => "consumer",
        }
    }

    pub fn opposite(&self) -> Role {
        match self {
            Role::Provider => Role::Consumer,
            Role::Consumer => Role::Provider,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope policy for matchmaking, declared per network under
/// `cns/{network}/orchestrator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Repeat the per-network match across every network.
    AllSystems,
    /// Match only within the provider's own network.
    BySystem,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Mode> {
        match s {
            "allsystems" => Some(Mode::AllSystems),
            "bysystem" => Some(Mode::BySystem),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::AllSystems => "allsystems",
            Mode::BySystem => "bysystem",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner-direction resolver.
///
/// A property flows away from the side that owns it: providers own it when
/// the profile flag is `"yes"`, consumers otherwise. Returns the role the
/// value flows to, or `None` when the write did not come from the owning
/// side and must be ignored.
pub fn opposite_role(role: Role, provider_flag: &str) -> Option<Role> {
    match (role, provider_flag == "yes") {
        (Role::Provider, true) => Some(Role::Consumer),
        (Role::Consumer, false) => Some(Role::Provider),
        _ => None,
    }
}
