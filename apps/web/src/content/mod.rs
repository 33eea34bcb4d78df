// Collection reads for public pages: backend client, view models, handlers.
// All backend traffic goes through `client`; no other module builds backend URLs
// except the reverse proxy, which forwards browser requests verbatim.

pub mod client;
pub mod handlers;
pub mod view;
