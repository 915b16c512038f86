use crate::cmd::manager::{CommandManager, ManagerRef};
use crate::loader::{LoadError, ManagerArgs};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub type Product = Box<dyn Any>;

type PlainCtor = Box<dyn Fn() -> anyhow::Result<Product>>;
type ArgsCtor = Box<dyn Fn(&ManagerArgs) -> anyhow::Result<Product>>;

/// How to build one plugin: without arguments, from constructor arguments,
/// or either way.
#[derive(Default)]
pub struct Factory {
    plain: Option<PlainCtor>,
    with_args: Option<ArgsCtor>,
}

impl Factory {
    pub fn plain<F>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<Product> + 'static,
    {
        Self {
            plain: Some(Box::new(f)),
            with_args: None,
        }
    }

    pub fn with_args<F>(f: F) -> Self
    where
        F: Fn(&ManagerArgs) -> anyhow::Result<Product> + 'static,
    {
        Self {
            plain: None,
            with_args: Some(Box::new(f)),
        }
    }

    pub fn and_args<F>(mut self, f: F) -> Self
    where
        F: Fn(&ManagerArgs) -> anyhow::Result<Product> + 'static,
    {
        self.with_args = Some(Box::new(f));
        self
    }

    /// Builds with `args` when given, otherwise with the plain constructor.
    pub fn build(&self, id: &str, args: Option<&ManagerArgs>) -> Result<Product, LoadError> {
        let result = match (args, &self.plain, &self.with_args) {
            (Some(args), _, Some(ctor)) => ctor(args),
            (None, Some(ctor), _) => ctor(),
            (Some(_), _, None) => {
                return Err(LoadError::NoConstructor {
                    id: id.to_string(),
                    form: "an argument-taking",
                });
            }
            (None, None, _) => {
                return Err(LoadError::NoConstructor {
                    id: id.to_string(),
                    form: "a plain",
                });
            }
        };
        result.map_err(|source| LoadError::Instantiate {
            id: id.to_string(),
            source,
        })
    }
}

/// Plugin factories keyed by identifier.
#[derive(Default)]
pub struct PluginRegistry {
    factories: HashMap<String, Factory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: &str, factory: Factory) {
        self.factories.insert(id.to_string(), factory);
    }

    /// Registers a command manager built from `Default`, accepting and
    /// ignoring constructor arguments.
    pub fn register_manager<M>(&mut self, id: &str)
    where
        M: CommandManager + Default + 'static,
    {
        let factory = Factory::plain(|| Ok(Box::new(Arc::new(M::default()) as ManagerRef) as Product))
            .and_args(|_| Ok(Box::new(Arc::new(M::default()) as ManagerRef) as Product));
        self.register(id, factory);
    }

    pub fn get(&self, id: &str) -> Option<&Factory> {
        self.factories.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_picks_constructor_form() {
        let f = Factory::plain(|| Ok(Box::new(1u32) as Product));
        assert!(f.build("one", None).is_ok());
        let err = f.build("one", Some(&ManagerArgs::new())).unwrap_err();
        assert!(matches!(err, LoadError::NoConstructor { .. }));

        let f = Factory::with_args(|a| Ok(Box::new(a.len()) as Product));
        let mut args = ManagerArgs::new();
        args.insert("k".into(), "v".into());
        let product = f.build("n", Some(&args)).unwrap();
        assert_eq!(*product.downcast::<usize>().unwrap(), 1);
        assert!(f.build("n", None).is_err());
    }

    #[test]
    fn failing_factory_is_an_instantiate_error() {
        let f = Factory::plain(|| anyhow::bail!("no resources"));
        let err = f.build("broken", None).unwrap_err();
        assert!(matches!(err, LoadError::Instantiate { ref id, .. } if id == "broken"));
    }
}
