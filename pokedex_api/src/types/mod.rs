mod pokemon;
pub use self::pokemon::{Artwork, NamedResource, OtherSprites, RawPokemon, Sprites, StatEntry, TypeSlot};

mod request;
pub(crate) use self::request::truncate_body;
pub use self::request::{FetchArgs, FetchResponse, Request, RequestInit, Resource};
