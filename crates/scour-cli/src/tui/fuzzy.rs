use nucleo::{
    Matcher, Utf32Str,
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
};

/// Fuzzy search over the rows of the results table.
pub struct RowMatcher {
    matcher: Matcher,
    buf: Vec<char>,
}

impl RowMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo::Config::DEFAULT.match_paths()),
            buf: Vec::new(),
        }
    }

    /// Indices of the haystacks matching `query`, best match first.
    /// An empty query keeps every index in its original order.
    pub fn filter<'a, I>(&mut self, query: &str, haystacks: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if query.trim().is_empty() {
            return haystacks.into_iter().enumerate().map(|(i, _)| i).collect();
        }

        let pattern = Pattern::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );

        let mut scored: Vec<(usize, u32)> = haystacks
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let haystack = Utf32Str::new(item, &mut self.buf);
                let score = pattern.score(haystack, &mut self.matcher)?;
                Some((i, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.into_iter().map(|(i, _)| i).collect()
    }
}
