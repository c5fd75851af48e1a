use super::{Val, ValueType, MAX_ARRAY_DIMENSIONS, MAX_ARRAY_ELEMENTS};
use crate::error;
use crate::lang::{Error, Symbol};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

/// Nesting depth of subprogram calls. Level 0 is the main program.
pub type Level = u8;

const MAX_STRING_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarKey {
    pub symbol: Symbol,
    pub level: Level,
}

impl VarKey {
    pub fn new(symbol: Symbol, level: Level) -> VarKey {
        VarKey { symbol, level }
    }
}

/// An entry either owns its value or refers to the entry that does.
/// Aliases always point at the owner, never at another alias.
#[derive(Debug)]
enum Storage<T> {
    Owned(T),
    Alias(VarKey),
}

#[derive(Debug)]
pub struct SimpleVariable {
    value_type: ValueType,
    storage: Storage<Val>,
}

impl SimpleVariable {
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.storage, Storage::Alias(_))
    }
}

#[derive(Debug)]
struct ArrayData {
    dimensions: Vec<usize>,
    values: Vec<Val>,
}

impl ArrayData {
    fn new(value_type: ValueType, dimensions: &[i32]) -> Result<ArrayData> {
        if dimensions.is_empty() {
            return Err(error!(WrongNumberOfDimensions));
        }
        if dimensions.len() > MAX_ARRAY_DIMENSIONS {
            return Err(error!(TooManyDimensions));
        }
        let mut extents = Vec::with_capacity(dimensions.len());
        let mut len: usize = 1;
        for &size in dimensions {
            if size <= 0 {
                return Err(error!(InvalidParameter; "DIMENSION MUST BE POSITIVE"));
            }
            len = match len.checked_mul(size as usize) {
                Some(len) if len <= MAX_ARRAY_ELEMENTS => len,
                _ => return Err(error!(OutOfMemory)),
            };
            extents.push(size as usize);
        }
        Ok(ArrayData {
            dimensions: extents,
            values: vec![Val::default_for(value_type); len],
        })
    }

    fn offset(&self, indices: &[i32]) -> Result<usize> {
        if indices.len() != self.dimensions.len() {
            return Err(error!(WrongNumberOfDimensions));
        }
        let mut offset = 0;
        for (&index, &extent) in indices.iter().zip(&self.dimensions) {
            if index < 0 || index as usize >= extent {
                return Err(error!(IndexOutOfBounds));
            }
            offset = offset * extent + index as usize;
        }
        Ok(offset)
    }
}

#[derive(Debug)]
pub struct ArrayVariable {
    value_type: ValueType,
    storage: Storage<ArrayData>,
}

impl ArrayVariable {
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.storage, Storage::Alias(_))
    }
}

/// ## Variable memory
///
/// Entries live in two arenas keyed by symbol and scope level. Leaving a
/// scope frees every entry at or above its level in one sweep.

#[derive(Debug, Default)]
pub struct Var {
    simple: HashMap<VarKey, SimpleVariable>,
    arrays: HashMap<VarKey, ArrayVariable>,
}

impl Var {
    pub fn new() -> Var {
        Var::default()
    }

    pub fn clear(&mut self) {
        self.simple.clear();
        self.arrays.clear();
    }

    pub fn len(&self) -> usize {
        self.simple.len() + self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_simple(&self, key: VarKey) -> Option<&SimpleVariable> {
        self.simple.get(&key)
    }

    pub fn create_simple(
        &mut self,
        key: VarKey,
        value_type: ValueType,
        reference: Option<VarKey>,
    ) -> Result<()> {
        if self.simple.contains_key(&key) {
            return Err(error!(VariableAlreadyDefined));
        }
        let storage = match reference {
            None => Storage::Owned(Val::default_for(value_type)),
            Some(target) => {
                let owner = self.simple_owner(target)?;
                if self.simple[&owner].value_type != value_type {
                    return Err(error!(TypeMismatch));
                }
                Storage::Alias(owner)
            }
        };
        self.simple.insert(
            key,
            SimpleVariable {
                value_type,
                storage,
            },
        );
        Ok(())
    }

    fn simple_owner(&self, key: VarKey) -> Result<VarKey> {
        match self.simple.get(&key) {
            Some(SimpleVariable {
                storage: Storage::Owned(_),
                ..
            }) => Ok(key),
            Some(SimpleVariable {
                storage: Storage::Alias(owner),
                ..
            }) => Ok(*owner),
            None => Err(error!(InternalError; "VARIABLE NOT FOUND")),
        }
    }

    pub fn fetch(&self, key: VarKey) -> Result<Val> {
        let owner = self.simple_owner(key)?;
        match &self.simple[&owner].storage {
            Storage::Owned(val) => Ok(val.clone()),
            Storage::Alias(_) => Err(error!(InternalError; "DANGLING REFERENCE")),
        }
    }

    pub fn store(&mut self, key: VarKey, value: Val) -> Result<()> {
        let owner = self.simple_owner(key)?;
        let var = match self.simple.get_mut(&owner) {
            Some(var) => var,
            None => return Err(error!(InternalError; "DANGLING REFERENCE")),
        };
        let value = checked(var.value_type, value)?;
        match &mut var.storage {
            Storage::Owned(val) => *val = value,
            Storage::Alias(_) => return Err(error!(InternalError; "DANGLING REFERENCE")),
        }
        Ok(())
    }

    pub fn free_simple(&mut self, min_level: Level) {
        self.simple.retain(|key, _| key.level < min_level);
    }

    pub fn get_array(&self, key: VarKey) -> Option<&ArrayVariable> {
        self.arrays.get(&key)
    }

    /// Allocates the backing buffer, replacing any previous one whole.
    /// Through a reference the owner's buffer is the one replaced.
    pub fn dim(&mut self, key: VarKey, value_type: ValueType, dimensions: &[i32]) -> Result<()> {
        self.dim_all(&[(key, value_type, dimensions.to_vec())])
    }

    /// Every buffer is built and checked before any is stored, so a
    /// failure leaves all arrays as they were.
    pub fn dim_all(&mut self, arrays: &[(VarKey, ValueType, Vec<i32>)]) -> Result<()> {
        let mut prepared = Vec::with_capacity(arrays.len());
        for (key, value_type, dimensions) in arrays {
            let data = ArrayData::new(*value_type, dimensions)?;
            let owner = self.dim_owner(*key, *value_type)?;
            prepared.push((*key, *value_type, owner, data));
        }
        for (key, value_type, owner, data) in prepared {
            match owner.and_then(|owner| self.arrays.get_mut(&owner)) {
                Some(var) => var.storage = Storage::Owned(data),
                None => {
                    self.arrays.insert(
                        key,
                        ArrayVariable {
                            value_type,
                            storage: Storage::Owned(data),
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn dim_owner(&self, key: VarKey, value_type: ValueType) -> Result<Option<VarKey>> {
        if !self.arrays.contains_key(&key) {
            return Ok(None);
        }
        let owner = self.array_owner(key)?;
        match self.arrays.get(&owner) {
            Some(var) if var.value_type != value_type => Err(error!(TypeMismatch)),
            Some(ArrayVariable {
                storage: Storage::Owned(_),
                ..
            }) => Ok(Some(owner)),
            _ => Err(error!(InternalError; "DANGLING REFERENCE")),
        }
    }

    pub fn create_array_reference(&mut self, key: VarKey, target: VarKey) -> Result<()> {
        if self.arrays.contains_key(&key) {
            return Err(error!(VariableAlreadyDefined));
        }
        let owner = self.array_owner(target)?;
        let value_type = self.arrays[&owner].value_type;
        self.arrays.insert(
            key,
            ArrayVariable {
                value_type,
                storage: Storage::Alias(owner),
            },
        );
        Ok(())
    }

    fn array_owner(&self, key: VarKey) -> Result<VarKey> {
        match self.arrays.get(&key) {
            Some(ArrayVariable {
                storage: Storage::Owned(_),
                ..
            }) => Ok(key),
            Some(ArrayVariable {
                storage: Storage::Alias(owner),
                ..
            }) => Ok(*owner),
            None => Err(error!(ArrayNotDimensioned)),
        }
    }

    fn array_data(&self, key: VarKey) -> Result<&ArrayData> {
        let owner = self.array_owner(key)?;
        match &self.arrays[&owner].storage {
            Storage::Owned(data) => Ok(data),
            Storage::Alias(_) => Err(error!(InternalError; "DANGLING REFERENCE")),
        }
    }

    pub fn array_dimensions(&self, key: VarKey) -> Result<&[usize]> {
        Ok(&self.array_data(key)?.dimensions)
    }

    pub fn array_value(&self, key: VarKey, indices: &[i32]) -> Result<&Val> {
        let data = self.array_data(key)?;
        let offset = data.offset(indices)?;
        Ok(&data.values[offset])
    }

    pub fn store_array(&mut self, key: VarKey, indices: &[i32], value: Val) -> Result<()> {
        let owner = self.array_owner(key)?;
        let var = match self.arrays.get_mut(&owner) {
            Some(var) => var,
            None => return Err(error!(InternalError; "DANGLING REFERENCE")),
        };
        let value = checked(var.value_type, value)?;
        match &mut var.storage {
            Storage::Owned(data) => {
                let offset = data.offset(indices)?;
                data.values[offset] = value;
                Ok(())
            }
            Storage::Alias(_) => Err(error!(InternalError; "DANGLING REFERENCE")),
        }
    }

    pub fn free_arrays(&mut self, min_level: Level) {
        self.arrays.retain(|key, _| key.level < min_level);
    }

    /// Scope exit. An alias always sits at a deeper level than its owner,
    /// so no surviving entry can refer into the freed levels.
    pub fn free(&mut self, min_level: Level) {
        self.free_simple(min_level);
        self.free_arrays(min_level);
    }
}

fn checked(value_type: ValueType, value: Val) -> Result<Val> {
    match (value_type, &value) {
        (ValueType::Number, Val::Number(_)) => Ok(value),
        (ValueType::String, Val::String(s)) => {
            if s.chars().count() > MAX_STRING_LEN {
                Err(error!(StringTooLong; "MAXIMUM STRING LENGTH IS 255"))
            } else {
                Ok(value)
            }
        }
        _ => Err(error!(TypeMismatch)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(symbol: Symbol, level: Level) -> VarKey {
        VarKey::new(symbol, level)
    }

    #[test]
    fn test_create_and_lookup() {
        let mut var = Var::new();
        assert!(var.get_simple(key(1, 0)).is_none());
        var.create_simple(key(1, 0), ValueType::Number, None).unwrap();
        assert!(var.get_simple(key(1, 0)).is_some());
        assert!(var.get_simple(key(1, 1)).is_none());
        assert_eq!(var.fetch(key(1, 0)).unwrap(), Val::Number(0.0));
        let e = var.create_simple(key(1, 0), ValueType::Number, None);
        assert_eq!(e.unwrap_err().code(), crate::lang::ErrorCode::VariableAlreadyDefined);
    }

    #[test]
    fn test_type_mismatch() {
        let mut var = Var::new();
        var.create_simple(key(1, 0), ValueType::String, None).unwrap();
        assert!(var.store(key(1, 0), Val::Number(1.0)).is_err());
        var.store(key(1, 0), Val::String("OK".into())).unwrap();
        assert_eq!(var.fetch(key(1, 0)).unwrap(), Val::String("OK".into()));
    }

    #[test]
    fn test_reference_writes_through() {
        let mut var = Var::new();
        var.create_simple(key(1, 0), ValueType::Number, None).unwrap();
        var.create_simple(key(2, 1), ValueType::Number, Some(key(1, 0))).unwrap();
        var.create_simple(key(3, 2), ValueType::Number, Some(key(2, 1))).unwrap();
        assert!(var.get_simple(key(3, 2)).unwrap().is_reference());
        var.store(key(3, 2), Val::Number(42.0)).unwrap();
        assert_eq!(var.fetch(key(1, 0)).unwrap(), Val::Number(42.0));
        var.free(2);
        var.free(1);
        assert_eq!(var.fetch(key(1, 0)).unwrap(), Val::Number(42.0));
        assert_eq!(var.len(), 1);
    }

    #[test]
    fn test_free_by_level() {
        let mut var = Var::new();
        var.create_simple(key(1, 0), ValueType::Number, None).unwrap();
        var.store(key(1, 0), Val::Number(5.0)).unwrap();
        var.create_simple(key(1, 1), ValueType::Number, None).unwrap();
        var.dim(key(2, 0), ValueType::Number, &[3]).unwrap();
        var.dim(key(2, 1), ValueType::Number, &[3]).unwrap();
        var.free_simple(1);
        var.free_arrays(1);
        assert!(var.get_simple(key(1, 1)).is_none());
        assert!(var.get_array(key(2, 1)).is_none());
        assert_eq!(var.fetch(key(1, 0)).unwrap(), Val::Number(5.0));
        assert!(var.get_array(key(2, 0)).is_some());
    }

    #[test]
    fn test_row_major() {
        let mut var = Var::new();
        var.dim(key(1, 0), ValueType::Number, &[2, 3]).unwrap();
        var.store_array(key(1, 0), &[1, 2], Val::Number(9.0)).unwrap();
        let data = var.array_data(key(1, 0)).unwrap();
        assert_eq!(data.values.len(), 6);
        assert_eq!(data.values[5], Val::Number(9.0));
        assert_eq!(data.offset(&[1, 0]).unwrap(), 3);
        assert!(var.array_value(key(1, 0), &[2, 0]).is_err());
        assert!(var.array_value(key(1, 0), &[0, -1]).is_err());
        assert!(var.array_value(key(1, 0), &[0]).is_err());
    }

    #[test]
    fn test_dim_limits() {
        let mut var = Var::new();
        assert!(var.dim(key(1, 0), ValueType::Number, &[0]).is_err());
        assert!(var.dim(key(1, 0), ValueType::Number, &[2, 2, 2, 2, 2]).is_err());
        assert!(var.get_array(key(1, 0)).is_none());
    }

    #[test]
    fn test_redim_discards() {
        let mut var = Var::new();
        var.dim(key(1, 0), ValueType::Number, &[4]).unwrap();
        var.store_array(key(1, 0), &[3], Val::Number(1.0)).unwrap();
        var.dim(key(1, 0), ValueType::Number, &[2, 2]).unwrap();
        assert_eq!(var.array_dimensions(key(1, 0)).unwrap(), &[2, 2]);
        assert_eq!(var.array_value(key(1, 0), &[1, 1]).unwrap(), &Val::Number(0.0));
    }

    #[test]
    fn test_dim_all_is_all_or_nothing() {
        let mut var = Var::new();
        var.dim(key(1, 0), ValueType::Number, &[4]).unwrap();
        var.store_array(key(1, 0), &[2], Val::Number(7.0)).unwrap();
        let e = var
            .dim_all(&[
                (key(1, 0), ValueType::Number, vec![6]),
                (key(2, 0), ValueType::Number, vec![0]),
            ])
            .unwrap_err();
        assert_eq!(e.code(), crate::lang::ErrorCode::InvalidParameter);
        assert_eq!(var.array_dimensions(key(1, 0)).unwrap(), &[4]);
        assert_eq!(var.array_value(key(1, 0), &[2]).unwrap(), &Val::Number(7.0));
        assert!(var.get_array(key(2, 0)).is_none());
    }

    #[test]
    fn test_array_reference() {
        let mut var = Var::new();
        var.dim(key(1, 0), ValueType::String, &[2]).unwrap();
        var.create_array_reference(key(5, 1), key(1, 0)).unwrap();
        var.store_array(key(5, 1), &[1], Val::String("X".into())).unwrap();
        var.free(1);
        assert_eq!(var.array_value(key(1, 0), &[1]).unwrap(), &Val::String("X".into()));
    }
}
