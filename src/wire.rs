use crate::*;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Tagged encoding of multi-valued containers.
///
/// JSON has no sets and no composite map keys, so every container names its
/// shape: `{"kind": "set", "items": [..]}`, `{"kind": "map", "entries":
/// [[k, v], ..]}`, and so on. Scalars are `atom`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Wire {
    Set { items: Vec<Wire> },
    Tuple { items: Vec<Wire> },
    Seq { items: Vec<Wire> },
    Map { entries: Vec<(Wire, Wire)> },
    Atom { value: Value },
}

impl Wire {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
    fn kind(&self) -> &'static str {
        match self {
            Self::Set { .. } => "set",
            Self::Tuple { .. } => "tuple",
            Self::Seq { .. } => "seq",
            Self::Map { .. } => "map",
            Self::Atom { .. } => "atom",
        }
    }
    fn atom(&self) -> anyhow::Result<&Value> {
        match self {
            Self::Atom { value } => Ok(value),
            other => anyhow::bail!("expected atom, found {}", other.kind()),
        }
    }
    fn items(&self, kind: &'static str) -> anyhow::Result<&[Wire]> {
        match (self, kind) {
            (Self::Set { items }, "set") => Ok(items),
            (Self::Tuple { items }, "tuple") => Ok(items),
            (Self::Seq { items }, "seq") => Ok(items),
            (other, _) => anyhow::bail!("expected {}, found {}", kind, other.kind()),
        }
    }
    fn tuple<const N: usize>(&self) -> anyhow::Result<&[Wire]> {
        let items = self.items("tuple")?;
        anyhow::ensure!(items.len() == N, "expected {}-tuple, found {} items", N, items.len());
        Ok(items)
    }
}

pub trait Encode {
    fn encode(&self) -> Wire;
}

pub trait Decode: Sized {
    fn decode(wire: &Wire) -> anyhow::Result<Self>;
}

impl Encode for String {
    fn encode(&self) -> Wire {
        Wire::Atom {
            value: Value::String(self.clone()),
        }
    }
}
impl Decode for String {
    fn decode(wire: &Wire) -> anyhow::Result<Self> {
        match wire.atom()? {
            Value::String(s) => Ok(s.clone()),
            other => anyhow::bail!("expected string atom, found {}", other),
        }
    }
}

macro_rules! integer {
    ($($t:ty),*) => {$(
        impl Encode for $t {
            fn encode(&self) -> Wire {
                Wire::Atom { value: Value::from(*self) }
            }
        }
        impl Decode for $t {
            fn decode(wire: &Wire) -> anyhow::Result<Self> {
                let value = wire.atom()?;
                let n = value
                    .as_i64()
                    .map(i128::from)
                    .or_else(|| value.as_u64().map(i128::from))
                    .ok_or_else(|| anyhow::anyhow!("expected integer atom, found {}", value))?;
                Ok(<$t>::try_from(n)?)
            }
        }
    )*};
}
integer!(u8, u16, u32, u64, usize, i32, i64);

impl Encode for f64 {
    fn encode(&self) -> Wire {
        Wire::Atom {
            value: Value::from(*self),
        }
    }
}
impl Decode for f64 {
    fn decode(wire: &Wire) -> anyhow::Result<Self> {
        let value = wire.atom()?;
        value
            .as_f64()
            .ok_or_else(|| anyhow::anyhow!("expected number atom, found {}", value))
    }
}

impl Encode for Rank {
    fn encode(&self) -> Wire {
        match self {
            Rank::Level(k) => k.encode(),
            Rank::Never => Wire::Atom {
                value: Value::from(self.to_string()),
            },
        }
    }
}
impl Decode for Rank {
    fn decode(wire: &Wire) -> anyhow::Result<Self> {
        match wire.atom()? {
            Value::String(s) if s == "inf" => Ok(Rank::Never),
            _ => Ok(Rank::Level(usize::decode(wire)?)),
        }
    }
}

impl<T> Encode for BTreeSet<T>
where
    T: Encode,
{
    fn encode(&self) -> Wire {
        Wire::Set {
            items: self.iter().map(Encode::encode).collect(),
        }
    }
}
impl<T> Decode for BTreeSet<T>
where
    T: Decode + Ord,
{
    fn decode(wire: &Wire) -> anyhow::Result<Self> {
        wire.items("set")?.iter().map(T::decode).collect()
    }
}

impl<T> Encode for Vec<T>
where
    T: Encode,
{
    fn encode(&self) -> Wire {
        Wire::Seq {
            items: self.iter().map(Encode::encode).collect(),
        }
    }
}
impl<T> Decode for Vec<T>
where
    T: Decode,
{
    fn decode(wire: &Wire) -> anyhow::Result<Self> {
        wire.items("seq")?.iter().map(T::decode).collect()
    }
}

impl<K, V> Encode for BTreeMap<K, V>
where
    K: Encode,
    V: Encode,
{
    fn encode(&self) -> Wire {
        Wire::Map {
            entries: self.iter().map(|(k, v)| (k.encode(), v.encode())).collect(),
        }
    }
}
impl<K, V> Decode for BTreeMap<K, V>
where
    K: Decode + Ord,
    V: Decode,
{
    fn decode(wire: &Wire) -> anyhow::Result<Self> {
        match wire {
            Wire::Map { entries } => entries
                .iter()
                .map(|(k, v)| Ok((K::decode(k)?, V::decode(v)?)))
                .collect(),
            other => anyhow::bail!("expected map, found {}", other.kind()),
        }
    }
}

impl<X, Y> Encode for (X, Y)
where
    X: Encode,
    Y: Encode,
{
    fn encode(&self) -> Wire {
        Wire::Tuple {
            items: vec![self.0.encode(), self.1.encode()],
        }
    }
}
impl<X, Y> Decode for (X, Y)
where
    X: Decode,
    Y: Decode,
{
    fn decode(wire: &Wire) -> anyhow::Result<Self> {
        let items = wire.tuple::<2>()?;
        Ok((X::decode(&items[0])?, Y::decode(&items[1])?))
    }
}

impl<X, Y, Z> Encode for (X, Y, Z)
where
    X: Encode,
    Y: Encode,
    Z: Encode,
{
    fn encode(&self) -> Wire {
        Wire::Tuple {
            items: vec![self.0.encode(), self.1.encode(), self.2.encode()],
        }
    }
}
impl<X, Y, Z> Decode for (X, Y, Z)
where
    X: Decode,
    Y: Decode,
    Z: Decode,
{
    fn decode(wire: &Wire) -> anyhow::Result<Self> {
        let items = wire.tuple::<3>()?;
        Ok((
            X::decode(&items[0])?,
            Y::decode(&items[1])?,
            Z::decode(&items[2])?,
        ))
    }
}

/// `(source, action, target)`.
impl<S, A> Encode for Transition<S, A>
where
    S: Ident + Encode,
    A: Ident + Encode,
{
    fn encode(&self) -> Wire {
        Wire::Tuple {
            items: vec![self.source.encode(), self.action.encode(), self.target.encode()],
        }
    }
}
impl<S, A> Decode for Transition<S, A>
where
    S: Ident + Decode,
    A: Ident + Decode,
{
    fn decode(wire: &Wire) -> anyhow::Result<Self> {
        let (source, action, target) = <(S, A, S)>::decode(wire)?;
        Ok(Self {
            source,
            target,
            action,
        })
    }
}

/// `(round, chosen, vod)` per round, in commit order.
impl<C> Encode for Allocation<C>
where
    C: Ident + Encode,
{
    fn encode(&self) -> Wire {
        Wire::Map {
            entries: vec![
                ("fakes".to_string().encode(), self.fakes.encode()),
                ("traps".to_string().encode(), self.traps.encode()),
                (
                    "sequence".to_string().encode(),
                    Wire::Seq {
                        items: self
                            .sequence()
                            .map(|(i, c, v)| Wire::Tuple {
                                items: vec![i.encode(), c.encode(), v.encode()],
                            })
                            .collect(),
                    },
                ),
            ],
        }
    }
}
