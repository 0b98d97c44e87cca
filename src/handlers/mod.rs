// handlers/mod.rs - Two-tier handler architecture
//
// Public (no auth) → Protected (session cookie auth)

pub mod public;    // Tier 1: No authentication required (/api/v1/auth/register, /api/v1/auth/login)
pub mod protected; // Tier 2: Session cookie required (/api/v1/me, /api/v1/post/*, /api/v1/auth/logout)
