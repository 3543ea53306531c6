use protanno::config::Config;

pub fn sources(config: &Config) {
    println!("Annotation sources (crawl order)");
    println!("================================");
    for (i, source) in config.sources.iter().enumerate() {
        println!("{:>2}. {:<20} {}", i + 1, source.name, source.url);
    }
    println!("\nSequence endpoint: {}", config.sequence.url);
}
