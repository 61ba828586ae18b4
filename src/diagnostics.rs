use serde::Serialize;

/// How loudly a [`Diagnostic`] is reported.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn level(&self) -> log::Level {
        match self {
            Self::Info => log::Level::Info,
            Self::Warning => log::Level::Warn,
            Self::Error => log::Level::Error,
            Self::Critical => log::Level::Error,
        }
    }
}

/// Recoverable conditions met while solving.
///
/// None of these abort a computation. Degenerate inputs produce trivial
/// results, model inconsistencies are repaired by intersection or skipping,
/// and re-solve misuse is a no-op.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Event {
    /// No final states: the whole graph goes to the opponent.
    EmptyFinal,
    /// `solve` called on a solved instance without `force`.
    AlreadySolved,
    /// Decoy states absent from the hypergame were dropped from its targets.
    MissingDecoy,
    /// A rationalizable action leads outside the hypergame.
    EscapingAction,
    /// A composed transition reaches the defender's sure-winning region.
    DefenderRegion,
    /// The base game does not alternate turns where the transform needs it.
    TurnAlternation,
    /// A candidate mapped onto true final states; those states were removed.
    FinalCandidate,
    /// Zero fakes and zero traps were requested.
    NoDecoys,
    /// A greedy phase ran out of unallocated candidates.
    Exhausted,
}

impl Event {
    pub fn severity(&self) -> Severity {
        match self {
            Self::EmptyFinal => Severity::Warning,
            Self::AlreadySolved => Severity::Warning,
            Self::MissingDecoy => Severity::Critical,
            Self::EscapingAction => Severity::Critical,
            Self::DefenderRegion => Severity::Info,
            Self::TurnAlternation => Severity::Error,
            Self::FinalCandidate => Severity::Warning,
            Self::NoDecoys => Severity::Warning,
            Self::Exhausted => Severity::Info,
        }
    }
}

/// A single structured diagnostic: what happened, where, and with which states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub component: &'static str,
    pub event: Event,
    pub context: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<20}{:?}: {}", self.component, self.event, self.context)
    }
}

/// Per-instance diagnostic sink.
///
/// Every solver owns one. Events are kept for inspection and mirrored to the
/// `log` facade with the emitting component as target, so nothing here is
/// process-global.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Record an event and forward it to the logger.
    pub fn emit(&mut self, component: &'static str, event: Event, context: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity: event.severity(),
            component,
            event,
            context: context.into(),
        };
        log::log!(target: component, diagnostic.severity.level(), "{}", diagnostic);
        self.0.push(diagnostic);
    }
    /// Absorb events recorded by a nested solver.
    pub fn absorb(&mut self, other: &Self) {
        self.0.extend(other.0.iter().cloned());
    }
    pub fn contains(&self, event: Event) -> bool {
        self.0.iter().any(|d| d.event == event)
    }
    pub fn count(&self, event: Event) -> usize {
        self.0.iter().filter(|d| d.event == event).count()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn clear(&mut self) {
        self.0.clear();
    }
}
