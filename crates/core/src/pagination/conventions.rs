//! Query parameter conventions the inventory endpoint may honor

/// One request of the "give me everything" battery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LargeLimitProbe {
    /// `<param>=<size>`
    Size(&'static str),
    /// A fixed flag such as `paginate=false`
    Flag(&'static str, &'static str),
}

impl LargeLimitProbe {
    /// Battery order.
    pub const BATTERY: [Self; 7] = [
        Self::Size("limit"),
        Self::Size("pageSize"),
        Self::Size("size"),
        Self::Size("perPage"),
        Self::Size("per_page"),
        Self::Flag("paginate", "false"),
        Self::Flag("all", "true"),
    ];

    pub fn params(&self, size: usize) -> Vec<(String, String)> {
        match self {
            Self::Size(param) => vec![((*param).to_string(), size.to_string())],
            Self::Flag(param, value) => vec![((*param).to_string(), (*value).to_string())],
        }
    }

    /// Number of items explicitly asked for, if any.
    pub fn requested(&self, size: usize) -> Option<usize> {
        match self {
            Self::Size(_) => Some(size),
            Self::Flag(..) => None,
        }
    }
}

/// Incremental paging convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageConvention {
    PageLimit,
    OffsetLimit,
    SkipTake,
    PagePageSize,
    PagePerPage,
}

impl PageConvention {
    /// Default trial order.
    pub const ALL: [Self; 5] = [
        Self::PageLimit,
        Self::OffsetLimit,
        Self::SkipTake,
        Self::PagePageSize,
        Self::PagePerPage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageLimit => "page+limit",
            Self::OffsetLimit => "offset+limit",
            Self::SkipTake => "skip+take",
            Self::PagePageSize => "page+pageSize",
            Self::PagePerPage => "page+per_page",
        }
    }

    /// Parameters for the zero-based page `index` of `page_size` items.
    pub fn params(&self, index: usize, page_size: usize) -> Vec<(String, String)> {
        let page = (index + 1).to_string();
        let offset = index.saturating_mul(page_size).to_string();
        let size = page_size.to_string();
        let pair = |k: &str, v: &str| (k.to_string(), v.to_string());
        match self {
            Self::PageLimit => vec![pair("page", &page), pair("limit", &size)],
            Self::OffsetLimit => vec![pair("offset", &offset), pair("limit", &size)],
            Self::SkipTake => vec![pair("skip", &offset), pair("take", &size)],
            Self::PagePageSize => vec![pair("page", &page), pair("pageSize", &size)],
            Self::PagePerPage => vec![pair("page", &page), pair("per_page", &size)],
        }
    }

    /// Trial order with `preferred` moved to the front.
    pub fn order(preferred: Option<Self>) -> Vec<Self> {
        let mut order = Self::ALL.to_vec();
        if let Some(preferred) = preferred {
            order.retain(|c| *c != preferred);
            order.insert(0, preferred);
        }
        order
    }
}
