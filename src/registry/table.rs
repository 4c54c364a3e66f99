use crate::route::RouteDescriptor;
use serde::Serialize;

/// Ordered route table of one controller, ready for registration with a
/// routing framework.
#[derive(Serialize)]
#[serde(transparent, bound = "")]
pub struct RouteTable<C> {
    routes: Vec<RouteDescriptor<C>>,
}

impl<C> RouteTable<C> {
    pub fn new(routes: Vec<RouteDescriptor<C>>) -> Self {
        Self { routes }
    }

    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteDescriptor<C>> {
        self.routes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&RouteDescriptor<C>> {
        self.routes.get(index)
    }

    pub fn into_vec(self) -> Vec<RouteDescriptor<C>> {
        self.routes
    }

    /// Render the table in the route-registration shape expected by the consumer
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl<C> Clone for RouteTable<C> {
    fn clone(&self) -> Self {
        Self {
            routes: self.routes.clone(),
        }
    }
}

impl<C> std::fmt::Debug for RouteTable<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}

impl<C> IntoIterator for RouteTable<C> {
    type Item = RouteDescriptor<C>;
    type IntoIter = std::vec::IntoIter<RouteDescriptor<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}

impl<'a, C> IntoIterator for &'a RouteTable<C> {
    type Item = &'a RouteDescriptor<C>;
    type IntoIter = std::slice::Iter<'a, RouteDescriptor<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
