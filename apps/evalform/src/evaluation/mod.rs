// Evaluation core: scoring, résumé encoding, record assembly, the session and
// the submission state machine. All outbound traffic goes through sheet_client.

pub mod encoder;
pub mod handlers;
pub mod invite;
pub mod payload;
pub mod scorer;
pub mod session;
pub mod submitter;
