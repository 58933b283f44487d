use colored::Colorize;
use once_cell::sync::Lazy;

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub published_at: &'static str,
    pub source: &'static str,
}

static MOCK_NEWS: Lazy<Vec<Article>> = Lazy::new(|| {
    vec![
        Article {
            id: 1,
            title: "Bitcoin Reaches New All-Time High Amid Institutional Adoption",
            description: "Major financial institutions continue to embrace Bitcoin as a store of value, driving unprecedented demand.",
            url: "#",
            published_at: "2 hours ago",
            source: "CryptoNews",
        },
        Article {
            id: 2,
            title: "Ethereum 2.0 Staking Rewards Hit Record Levels",
            description: "The transition to proof-of-stake has created new opportunities for passive income generation.",
            url: "#",
            published_at: "4 hours ago",
            source: "DeFi Daily",
        },
        Article {
            id: 3,
            title: "Regulatory Clarity Boosts Crypto Market Confidence",
            description: "New guidelines from financial regulators provide clearer framework for cryptocurrency operations.",
            url: "#",
            published_at: "6 hours ago",
            source: "Blockchain Tribune",
        },
        Article {
            id: 4,
            title: "NFT Market Shows Signs of Recovery",
            description: "Trading volumes increase as new utility-focused projects gain traction.",
            url: "#",
            published_at: "8 hours ago",
            source: "Digital Assets Today",
        },
    ]
});

pub fn articles() -> &'static [Article] {
    &MOCK_NEWS
}

pub fn print_news() {
    for article in articles() {
        println!("{} {}", format!("[{}]", article.id).dimmed(), article.title.bold());
        println!(
            "{}",
            format!("{} • {}", article.published_at, article.source).dimmed()
        );
        println!("{}", article.description);
        if article.url != "#" {
            println!("{}", article.url.underline());
        }
        println!();
    }
}
