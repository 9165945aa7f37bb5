//! The WLD token's event kinds and the entities they project into.
//!
//! One table drives everything: for each kind it lists the parameters copied
//! onto the entity, the wire parameters that are carried but deliberately not
//! persisted, and the fields worth a diagnostic line. From it `define_events!`
//! generates
//!
//! - a params struct per kind (`Transfer`, ...), holding every wire parameter,
//! - an entity struct per kind (`TransferEntity`, ...), holding the id, the
//!   copied parameters and the three provenance attributes,
//! - the closed enums [`EntityKind`], [`WldEvent`] and [`Entity`],
//! - the [`EventKind`] mapping for all of the above.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::DecodeError;
use crate::event::{EventKind, TraceValue};
use crate::types::EventMeta;

/// Trace key for a field: its own name, or the wire name given with `as`.
macro_rules! trace_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident as $name:literal) => {
        $name
    };
}

macro_rules! define_events {
    (
        $(
            $(#[$doc:meta])*
            $kind:ident => $entity:ident {
                copy {
                    $( $(#[$cattr:meta])* $cfield:ident : $cty:ty ),* $(,)?
                }
                $( omit {
                    $( $(#[$oattr:meta])* $ofield:ident : $oty:ty ),* $(,)?
                } )?
                trace [ $( $tfield:ident $( as $tname:literal )? ),* $(,)? ]
            }
        )+
    ) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
            #[serde(rename_all = "camelCase")]
            pub struct $kind {
                $( $(#[$cattr])* pub $cfield: $cty, )*
                $( $( $(#[$oattr])* pub $ofield: $oty, )* )?
            }

            #[doc = concat!("Persisted projection of one [`", stringify!($kind), "`] event.")]
            #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
            #[serde(rename_all = "camelCase")]
            pub struct $entity {
                pub id: EntityId,
                $( $(#[$cattr])* pub $cfield: $cty, )*
                pub block_number: u64,
                pub block_timestamp: u64,
                pub transaction_hash: B256,
            }

            impl EventKind for $kind {
                type Entity = $entity;

                fn kind(&self) -> EntityKind {
                    EntityKind::$kind
                }

                fn into_entity(self, meta: &EventMeta) -> $entity {
                    let $kind { $( $cfield, )* .. } = self;
                    $entity {
                        id: meta.entity_id(),
                        $( $cfield, )*
                        block_number: meta.block_number,
                        block_timestamp: meta.block_timestamp,
                        transaction_hash: meta.transaction_hash,
                    }
                }

                fn trace_fields(&self) -> Vec<(&'static str, String)> {
                    vec![ $( (trace_name!($tfield $( as $tname )?), self.$tfield.trace_value()), )* ]
                }
            }

            impl From<$kind> for WldEvent {
                fn from(params: $kind) -> Self {
                    WldEvent::$kind(params)
                }
            }

            impl From<$entity> for Entity {
                fn from(entity: $entity) -> Self {
                    Entity::$kind(entity)
                }
            }
        )+

        /// Name of an event kind, and of the entity variant it projects into.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum EntityKind {
            $( $kind, )+
        }

        impl EntityKind {
            pub const ALL: &'static [EntityKind] = &[ $( EntityKind::$kind, )+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( EntityKind::$kind => stringify!($kind), )+
                }
            }

            /// Event parameters copied onto the entity, in declaration order.
            pub fn entity_fields(&self) -> &'static [&'static str] {
                match self {
                    $( EntityKind::$kind => &[ $( stringify!($cfield), )* ], )+
                }
            }
        }

        impl std::str::FromStr for EntityKind {
            type Err = DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( stringify!($kind) => Ok(EntityKind::$kind), )+
                    other => Err(DecodeError::UnknownSchema { schema: other.to_string() }),
                }
            }
        }

        /// Any one of the contract's events.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "event", content = "params")]
        pub enum WldEvent {
            $( $kind($kind), )+
        }

        impl WldEvent {
            /// Build a typed event from its schema name and a JSON object of
            /// parameters keyed by their camelCase names.
            pub fn from_fields(schema: &str, fields: serde_json::Value) -> Result<Self, DecodeError> {
                let kind: EntityKind = schema.parse()?;
                let decoded = match kind {
                    $( EntityKind::$kind => serde_json::from_value(fields).map(WldEvent::$kind), )+
                };
                decoded.map_err(|source| DecodeError::Fields {
                    schema: schema.to_string(),
                    source,
                })
            }
        }

        impl EventKind for WldEvent {
            type Entity = Entity;

            fn kind(&self) -> EntityKind {
                match self {
                    $( WldEvent::$kind(_) => EntityKind::$kind, )+
                }
            }

            fn into_entity(self, meta: &EventMeta) -> Entity {
                match self {
                    $( WldEvent::$kind(params) => Entity::$kind(params.into_entity(meta)), )+
                }
            }

            fn trace_fields(&self) -> Vec<(&'static str, String)> {
                match self {
                    $( WldEvent::$kind(params) => params.trace_fields(), )+
                }
            }
        }

        /// One persisted record, polymorphic over the event kinds.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "kind")]
        pub enum Entity {
            $( $kind($entity), )+
        }

        impl Entity {
            pub fn id(&self) -> &EntityId {
                match self {
                    $( Entity::$kind(e) => &e.id, )+
                }
            }

            pub fn kind(&self) -> EntityKind {
                match self {
                    $( Entity::$kind(_) => EntityKind::$kind, )+
                }
            }

            pub fn block_number(&self) -> u64 {
                match self {
                    $( Entity::$kind(e) => e.block_number, )+
                }
            }

            pub fn block_timestamp(&self) -> u64 {
                match self {
                    $( Entity::$kind(e) => e.block_timestamp, )+
                }
            }

            pub fn transaction_hash(&self) -> &B256 {
                match self {
                    $( Entity::$kind(e) => &e.transaction_hash, )+
                }
            }
        }
    };
}

define_events! {
    /// ERC-20 allowance of `spender` over `owner`'s tokens set to `value`.
    Approval => ApprovalEntity {
        copy {
            owner: Address,
            spender: Address,
            #[serde(with = "crate::serde_uint::decimal")]
            value: U256,
        }
        trace [owner, spender, value]
    }

    /// Tokens minted by the inflation schedule.
    InflationTokensMinted => InflationTokensMintedEntity {
        copy {
            minter: Address,
            to: Address,
            #[serde(with = "crate::serde_uint::decimal")]
            amount: U256,
        }
        trace [minter, to, amount]
    }

    /// Two-step ownership handover initiated.
    OwnershipTransferStarted => OwnershipTransferStartedEntity {
        copy {
            previous_owner: Address,
            new_owner: Address,
        }
        trace [previous_owner as "previousOwner", new_owner as "newOwner"]
    }

    /// Ownership handover completed.
    OwnershipTransferred => OwnershipTransferredEntity {
        copy {
            previous_owner: Address,
            new_owner: Address,
        }
        trace [previous_owner as "previousOwner", new_owner as "newOwner"]
    }

    /// Token metadata and inflation parameters (re)configured.
    ///
    /// The initial holder list and amounts travel with the event but are not
    /// part of the entity.
    TokenUpdated => TokenUpdatedEntity {
        copy {
            new_token: Address,
            name: String,
            symbol: String,
            #[serde(with = "crate::serde_uint::decimal")]
            inflation_cap_period: U256,
            #[serde(with = "crate::serde_uint::decimal")]
            inflation_cap_wad: U256,
            #[serde(with = "crate::serde_uint::decimal")]
            inflation_lock_period: U256,
        }
        omit {
            existing_holders: Vec<Address>,
            #[serde(with = "crate::serde_uint::decimal_seq")]
            existings_amounts: Vec<U256>,
        }
        trace [new_token as "newToken", name, symbol]
    }

    /// Initial mint to the configured holders.
    TokensMinted => TokensMintedEntity {
        copy {
            minter: Address,
            #[serde(with = "crate::serde_uint::decimal_seq")]
            new_amounts: Vec<U256>,
        }
        trace [minter, new_amounts as "newAmounts"]
    }

    /// ERC-20 transfer of `value` from `from` to `to`.
    Transfer => TransferEntity {
        copy {
            from: Address,
            to: Address,
            #[serde(with = "crate::serde_uint::decimal")]
            value: U256,
        }
        trace [from, to, value]
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
