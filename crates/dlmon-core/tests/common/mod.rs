pub mod steam_root;
