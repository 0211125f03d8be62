// End-to-end tests for the Coqui TTS service
//
// The HTTP API is driven in-process through the axum router. Synthesis
// backends are replaced by mockito servers speaking the self-hosted and
// cloud Coqui protocols, and every test gets its own temporary cache
// directory, so tests run in parallel without sharing state.

mod helpers;
mod test_cloud_backend;
mod test_health;
