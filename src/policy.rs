/// The configuration a map was built with.
///
/// At this time, the configuration cannot be modified after the map is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    name: Option<String>,
    num_partitions: usize,
    initial_capacity: Option<usize>,
}

impl Policy {
    pub(crate) fn new(
        name: Option<String>,
        num_partitions: usize,
        initial_capacity: Option<usize>,
    ) -> Self {
        Self {
            name,
            num_partitions,
            initial_capacity,
        }
    }

    /// Returns the name of the map, if one was given to the builder.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the number of internal partitions of the map.
    ///
    /// A map guarded by a single lock reports one partition.
    pub fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    /// Returns the `initial_capacity` of the whole map, if one was given to the
    /// builder.
    pub fn initial_capacity(&self) -> Option<usize> {
        self.initial_capacity
    }
}
