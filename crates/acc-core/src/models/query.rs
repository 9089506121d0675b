//! Collection query options.

use std::collections::BTreeMap;

/// Query options shared by ACC collection endpoints.
///
/// # Example
///
/// ```
/// use acc_core::ListOptions;
///
/// let opts = ListOptions::new()
///     .filter("status", ["open", "draft"])
///     .limit(50);
/// assert_eq!(opts.to_query_string(), "?filter%5Bstatus%5D=open%2Cdraft&limit=50");
/// assert_eq!(ListOptions::new().to_query_string(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub include: Vec<String>,
    pub filters: BTreeMap<String, Vec<String>>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Vec<String>,
    pub fields: Vec<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include<I, S>(mut self, include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(include.into_iter().map(Into::into));
        self
    }

    /// Add `filter[key]=v1,v2`.
    pub fn filter<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort.extend(sort.into_iter().map(Into::into));
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Encode as a query string, including the leading `?`, or an empty
    /// string when no option is set.
    pub fn to_query_string(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());

        if !self.include.is_empty() {
            query.append_pair("include", &self.include.join(","));
        }
        for (key, values) in &self.filters {
            query.append_pair(&format!("filter[{}]", key), &values.join(","));
        }
        if let Some(offset) = self.offset {
            query.append_pair("offset", &offset.to_string());
        }
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if !self.sort.is_empty() {
            query.append_pair("sortBy", &self.sort.join(","));
        }
        if !self.fields.is_empty() {
            query.append_pair("fields", &self.fields.join(","));
        }

        let encoded = query.finish();
        if encoded.is_empty() {
            encoded
        } else {
            format!("?{}", encoded)
        }
    }
}
