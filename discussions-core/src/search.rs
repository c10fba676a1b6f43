#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicFilter {
    Title(String),
    Username(String),
}

impl TopicFilter {
    fn same_kind(&self, other: &TopicFilter) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Equality filters plus an optional free-text term, paged by skip/limit.
///
/// Each kind of filter can only be applied once; later ones of the same kind are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSearch {
    filters: Vec<TopicFilter>,
    term: Option<String>,
    skip: u64,
    limit: u64,
}

impl TopicSearch {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            filters: Vec::new(),
            term: None,
            skip,
            limit,
        }
    }

    pub fn add(&mut self, filter: TopicFilter) -> &mut Self {
        if !self.filters.iter().any(|f| f.same_kind(&filter)) {
            self.filters.push(filter);
        }
        self
    }

    pub fn with(mut self, filter: TopicFilter) -> Self {
        self.add(filter);
        self
    }

    /// Blank terms are treated as no term at all.
    pub fn with_term(self, term: impl Into<String>) -> Self {
        let term = term.into();
        Self {
            term: (!term.trim().is_empty()).then_some(term),
            ..self
        }
    }

    pub fn filters(&self) -> &[TopicFilter] {
        &self.filters
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}
