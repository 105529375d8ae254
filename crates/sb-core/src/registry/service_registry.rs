//! Static service registry with dependency-graph validation.

use crate::registry::{RegistryError, RegistryResult, ServiceDescriptor};

use std::collections::{HashMap, HashSet};

use sb_config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Validated, ordered set of service descriptors.
///
/// Construction fails on duplicate ids, duplicate primary ports, dangling
/// dependency references and dependency cycles, so every `Registry` value
/// describes a DAG.
#[derive(Debug, Clone)]
pub struct Registry {
    services: Vec<ServiceDescriptor>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Build from loaded configuration. Descriptor-level config errors are
    /// reported as `InvalidDescriptor`.
    pub fn from_config(config: &Config) -> RegistryResult<Self> {
        let mut descriptors = Vec::with_capacity(config.services.len());

        for service in &config.services {
            service
                .validate()
                .map_err(|e| RegistryError::invalid(&service.id, e.to_string()))?;
            descriptors.push(ServiceDescriptor::from_config(service, config));
        }

        Self::new(descriptors)
    }

    pub fn new(services: Vec<ServiceDescriptor>) -> RegistryResult<Self> {
        let mut index = HashMap::with_capacity(services.len());
        let mut ports: HashMap<u16, &str> = HashMap::new();

        for (i, service) in services.iter().enumerate() {
            if service.id.trim().is_empty() {
                return Err(RegistryError::invalid("<unnamed>", "id cannot be empty"));
            }
            if service.command.first().is_none_or(|p| p.trim().is_empty()) {
                return Err(RegistryError::invalid(&service.id, "command cannot be empty"));
            }
            if service.port == 0 {
                return Err(RegistryError::invalid(&service.id, "port cannot be 0"));
            }
            if index.insert(service.id.clone(), i).is_some() {
                return Err(RegistryError::duplicate(&service.id));
            }
            if let Some(other) = ports.insert(service.port, &service.id) {
                return Err(RegistryError::invalid(
                    &service.id,
                    format!("port {} is already used by '{other}'", service.port),
                ));
            }
        }

        for service in &services {
            for dep in &service.depends_on {
                if !index.contains_key(dep) {
                    return Err(RegistryError::unknown_dependency(&service.id, dep));
                }
            }
        }

        let registry = Self { services, index };

        if let Some(cycle) = registry.find_cycle() {
            return Err(RegistryError::cyclic(cycle));
        }

        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&ServiceDescriptor> {
        self.index.get(id).map(|&i| &self.services[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(|s| s.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Services that list `id` in their `depends_on`.
    pub fn dependents(&self, id: &str) -> Vec<&ServiceDescriptor> {
        self.services
            .iter()
            .filter(|s| s.depends_on.iter().any(|d| d == id))
            .collect()
    }

    /// Dependency-first launch order for `id`, ending with `id` itself.
    pub fn startup_order(&self, id: &str) -> RegistryResult<Vec<&ServiceDescriptor>> {
        let &root = self
            .index
            .get(id)
            .ok_or_else(|| RegistryError::unknown_service(id))?;

        let mut order = Vec::new();
        let mut seen = HashSet::new();
        self.post_order(root, &mut seen, &mut order);

        Ok(order.into_iter().map(|i| &self.services[i]).collect())
    }

    fn post_order(&self, i: usize, seen: &mut HashSet<usize>, order: &mut Vec<usize>) {
        if !seen.insert(i) {
            return;
        }
        for dep in &self.services[i].depends_on {
            if let Some(&j) = self.index.get(dep) {
                self.post_order(j, seen, order);
            }
        }
        order.push(i);
    }

    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut marks = vec![Mark::Unvisited; self.services.len()];
        let mut path = Vec::new();

        for i in 0..self.services.len() {
            if marks[i] == Mark::Unvisited
                && let Some(cycle) = self.visit(i, &mut marks, &mut path)
            {
                return Some(cycle);
            }
        }

        None
    }

    fn visit(&self, i: usize, marks: &mut [Mark], path: &mut Vec<usize>) -> Option<Vec<String>> {
        marks[i] = Mark::InProgress;
        path.push(i);

        for dep in &self.services[i].depends_on {
            let Some(&j) = self.index.get(dep) else {
                continue;
            };

            match marks[j] {
                Mark::InProgress => {
                    let start = path.iter().position(|&k| k == j).unwrap_or(0);
                    let mut cycle: Vec<String> = path[start..]
                        .iter()
                        .map(|&k| self.services[k].id.clone())
                        .collect();
                    cycle.push(self.services[j].id.clone());
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    if let Some(cycle) = self.visit(j, marks, path) {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }

        path.pop();
        marks[i] = Mark::Done;
        None
    }
}
