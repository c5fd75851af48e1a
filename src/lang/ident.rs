use std::collections::HashMap;
use std::rc::Rc;

// Used in both Token and the variable store

pub type Symbol = usize;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Ident {
    Plain(Symbol),
    String(Symbol),
}

impl Ident {
    pub fn symbol(&self) -> Symbol {
        match self {
            Ident::Plain(s) | Ident::String(s) => *s,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Ident::String(_))
    }
}

/// ## Symbol table
///
/// Names are interned once by the lexer. `A` and `A$` are distinct symbols.

#[derive(Debug, Default)]
pub struct Symbols {
    names: Vec<Rc<str>>,
    index: HashMap<Rc<str>, Symbol>,
}

impl Symbols {
    pub fn new() -> Symbols {
        Symbols::default()
    }

    pub fn intern(&mut self, name: &str) -> Ident {
        let symbol = match self.index.get(name) {
            Some(symbol) => *symbol,
            None => {
                let name: Rc<str> = name.into();
                let symbol = self.names.len();
                self.names.push(name.clone());
                self.index.insert(name, symbol);
                symbol
            }
        };
        if name.ends_with('$') {
            Ident::String(symbol)
        } else {
            Ident::Plain(symbol)
        }
    }

    pub fn name(&self, symbol: Symbol) -> Option<&str> {
        self.names.get(symbol).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut symbols = Symbols::new();
        let a = symbols.intern("A");
        let a_str = symbols.intern("A$");
        assert_eq!(symbols.intern("A"), a);
        assert_ne!(a.symbol(), a_str.symbol());
        assert!(a_str.is_string());
        assert_eq!(symbols.name(a_str.symbol()), Some("A$"));
        assert_eq!(symbols.len(), 2);
    }
}
