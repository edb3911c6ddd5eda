mod health;
mod helpers;
mod home;
mod login;
mod signup;
mod users;
