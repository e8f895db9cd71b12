/// Number of scalar arguments an operation accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgCount {
    Exact(usize),
    /// Any number, including none. Missing values fall back to defaults.
    Variable,
}

impl ArgCount {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            ArgCount::Exact(n) => *n == count,
            ArgCount::Variable => true,
        }
    }
}

/// Static arity declaration of an operation, as consumed by a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpDescriptor {
    pub name: &'static str,
    pub min_inputs: usize,
    pub min_outputs: usize,
    /// Output shapes depend on the scalar arguments, not only on input shapes.
    pub is_configurable: bool,
    pub num_int_args: ArgCount,
    pub num_float_args: ArgCount,
    /// The operation may write its result into its first input.
    pub in_place: bool,
}

impl OpDescriptor {
    /// Descriptor with no scalar arguments, not configurable, not in-place.
    pub const fn new(name: &'static str, min_inputs: usize, min_outputs: usize) -> Self {
        OpDescriptor {
            name,
            min_inputs,
            min_outputs,
            is_configurable: false,
            num_int_args: ArgCount::Exact(0),
            num_float_args: ArgCount::Exact(0),
            in_place: false,
        }
    }

    pub const fn configurable(mut self) -> Self {
        self.is_configurable = true;
        self
    }

    pub const fn with_int_args(mut self, count: ArgCount) -> Self {
        self.num_int_args = count;
        self
    }

    pub const fn with_float_args(mut self, count: ArgCount) -> Self {
        self.num_float_args = count;
        self
    }

    pub const fn allow_in_place(mut self) -> Self {
        self.in_place = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let d = OpDescriptor::new("roll", 1, 1)
            .configurable()
            .with_int_args(ArgCount::Variable)
            .allow_in_place();
        assert!(d.is_configurable);
        assert!(d.in_place);
        assert!(d.num_int_args.accepts(0));
        assert!(d.num_int_args.accepts(3));
        assert!(d.num_float_args.accepts(0));
        assert!(!d.num_float_args.accepts(1));
    }
}
