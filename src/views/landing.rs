pub fn render() -> String {
    r##"
<div class="landing">
  <h1 class="landing-title">TRANSCENDENCE<br><span>PONG 3D</span></h1>
  <p class="landing-tagline">Welcome! Classic pong, online.</p>
  <div class="landing-actions">
    <a href="#/login" class="primary-btn">Login</a>
    <a href="#/register" class="secondary-btn">Register</a>
  </div>
</div>
"##
    .to_string()
}
