/// Kind of addressable repository object, without database dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DsoType {
    Site,
    Community,
    Collection,
    Item,
    Bitstream,
}

impl DsoType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Community => "community",
            Self::Collection => "collection",
            Self::Item => "item",
            Self::Bitstream => "bitstream",
        }
    }

    /// Plural path segment used in authorization resource paths.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Community => "communities",
            Self::Collection => "collections",
            Self::Item => "items",
            Self::Bitstream => "bitstreams",
        }
    }
}

impl std::fmt::Display for DsoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a browse listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parses `ASC`/`DESC` case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Ascending)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Descending)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}
