use anyhow::Result;

use crate::core::{
    context::Ctx,
    message::{Color, Embed},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub content: String,
}

/// Ordered pages of text sent as a sequence of embeds.
#[derive(Clone, Debug, Default)]
pub struct Paginator {
    pages: Vec<Page>,
    pub default_title: Option<String>,
    pub color: Color,
}

impl Paginator {
    /// Pack `entries` into pages of at most `page_size` characters.
    ///
    /// Entries are joined with `\n` and never reordered. An entry longer than
    /// a whole page is split across as many pages as it needs.
    pub fn create_from_list<I, S>(entries: I, page_size: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let page_size = page_size.max(1);
        let mut pages = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for entry in entries {
            let entry = entry.as_ref();
            let entry_len = entry.chars().count();

            if entry_len > page_size {
                if current_len > 0 {
                    pages.push(Page {
                        content: std::mem::take(&mut current),
                    });
                    current_len = 0;
                }
                let chars: Vec<char> = entry.chars().collect();
                for chunk in chars.chunks(page_size) {
                    pages.push(Page {
                        content: chunk.iter().collect(),
                    });
                }
                continue;
            }

            let needed = if current_len == 0 {
                entry_len
            } else {
                current_len + 1 + entry_len
            };
            if needed > page_size {
                pages.push(Page {
                    content: std::mem::take(&mut current),
                });
                current_len = 0;
            }

            if current_len > 0 {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(entry);
            current_len += entry_len;
        }

        if current_len > 0 {
            pages.push(Page { content: current });
        }

        Self {
            pages,
            default_title: None,
            color: Color::BLURPLE,
        }
    }

    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = Some(title.into());
        self
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn embed_for(&self, index: usize) -> Embed {
        let mut embed = Embed::new()
            .description(self.pages[index].content.clone())
            .color(self.color)
            .footer(format!("Page {}/{}", index + 1, self.pages.len()));
        if let Some(title) = &self.default_title {
            embed = embed.title(title.clone());
        }
        embed
    }

    /// Send every page in order through `ctx`.
    pub async fn send(&self, ctx: &Ctx) -> Result<()> {
        for index in 0..self.pages.len() {
            ctx.reply_embed(self.embed_for(index)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn contents(paginator: &Paginator) -> Vec<&str> {
        paginator.pages().iter().map(|p| p.content.as_str()).collect()
    }

    #[test]
    fn packs_entries_up_to_page_size() {
        let paginator = Paginator::create_from_list(["aaaa", "bbbb", "cccc"], 9);
        assert_eq!(contents(&paginator), ["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn no_entry_is_dropped_on_overflow() {
        let entries: Vec<String> = (0..50).map(|i| format!("{:019}", i)).collect();
        let paginator = Paginator::create_from_list(&entries, 500);

        assert!(paginator.pages().iter().all(|p| p.content.chars().count() <= 500));
        let rejoined: Vec<&str> = paginator
            .pages()
            .iter()
            .flat_map(|p| p.content.split('\n'))
            .collect();
        assert_eq!(rejoined.len(), 50);
        assert_eq!(rejoined[49], entries[49]);
        assert_eq!(paginator.len(), 2);
    }

    #[test]
    fn oversized_entry_is_split() {
        let paginator = Paginator::create_from_list(["ab", "ééééé", "c"], 2);
        assert_eq!(contents(&paginator), ["ab", "éé", "éé", "é", "c"]);
    }

    #[test]
    fn empty_list_has_no_pages() {
        let paginator = Paginator::create_from_list(Vec::<String>::new(), 500);
        assert!(paginator.is_empty());
    }

    #[tokio::test]
    async fn send_emits_one_embed_per_page() {
        let (tx, mut rx) = mpsc::channel(8);
        let ctx = Ctx::new("!", "help", Vec::new(), tx);
        let paginator =
            Paginator::create_from_list(["one", "two"], 3).with_default_title("Ayiou Help Command");
        paginator.send(&ctx).await.unwrap();
        drop(ctx);

        let mut embeds = Vec::new();
        while let Some(reply) = rx.recv().await {
            embeds.push(reply.as_embed().cloned().unwrap());
        }
        assert_eq!(embeds.len(), 2);
        assert_eq!(embeds[0].title.as_deref(), Some("Ayiou Help Command"));
        assert_eq!(embeds[0].description.as_deref(), Some("one"));
        assert_eq!(embeds[1].footer.as_deref(), Some("Page 2/2"));
        assert_eq!(embeds[1].color, Color::BLURPLE);
    }
}
