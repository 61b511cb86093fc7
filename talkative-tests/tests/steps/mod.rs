mod pairing_steps;
mod presence_steps;
mod relay_steps;
