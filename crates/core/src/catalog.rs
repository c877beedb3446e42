//! Compiled-in tip catalog.
//!
//! Every tip belongs to exactly one [`Category`].  The tables are plain
//! `static` slices so the catalog is always available, which is what lets the
//! selector's uniform fallback never fail.

use serde::{Deserialize, Serialize};

/// A grouping of tips sharing a theme; the unit of weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    General,
    Shortcuts,
    Tricks,
    OsTips,
    AssistantTips,
    VersionControl,
}

impl Category {
    /// Pool order used by the selector.
    pub const ALL: [Category; 6] = [
        Category::VersionControl,
        Category::OsTips,
        Category::Shortcuts,
        Category::Tricks,
        Category::AssistantTips,
        Category::General,
    ];

    pub fn tips(self) -> &'static [&'static str] {
        match self {
            Category::General => GENERAL_TIPS,
            Category::Shortcuts => SHORTCUT_TIPS,
            Category::Tricks => TRICK_TIPS,
            Category::OsTips => OS_TIPS,
            Category::AssistantTips => ASSISTANT_TIPS,
            Category::VersionControl => VERSION_CONTROL_TIPS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Shortcuts => "shortcuts",
            Category::Tricks => "tricks",
            Category::OsTips => "os_tips",
            Category::AssistantTips => "assistant_tips",
            Category::VersionControl => "version_control",
        }
    }
}

/// Iterate every tip in the catalog, category by category.
pub fn all_tips() -> impl Iterator<Item = &'static str> {
    Category::ALL
        .into_iter()
        .flat_map(|category| category.tips().iter().copied())
}

/// Returns the category a tip belongs to.  Tips duplicated across tables
/// resolve to the first table in [`Category::ALL`] order.
pub fn category_of(tip: &str) -> Option<Category> {
    Category::ALL
        .into_iter()
        .find(|category| category.tips().contains(&tip))
}

// ── Tables ───────────────────────────────────────────────────────────────────

pub static GENERAL_TIPS: &[&str] = &[
    "💡 Tip: Use 'Ctrl+R' to search command history",
    "💡 Tip: Use 'cd -' to go back to previous directory",
    "💡 Tip: Use '!!' to repeat last command",
    "💡 Tip: Use 'history | grep <term>' to search history",
    "💡 Tip: Use 'Ctrl+L' to clear screen (same as 'clear')",
    "💡 Tip: Use 'Ctrl+U' to clear line before cursor",
    "💡 Tip: Use 'Ctrl+A' to jump to line start",
    "💡 Tip: Use 'Ctrl+E' to jump to line end",
    "💡 Tip: Use 'ls -lah' for detailed file listing",
    "💡 Tip: Use 'tail -f file.log' to follow log files",
];

pub static SHORTCUT_TIPS: &[&str] = &[
    "⌨️  Shortcut: Ctrl+A - Jump to beginning of line",
    "⌨️  Shortcut: Ctrl+E - Jump to end of line",
    "⌨️  Shortcut: Ctrl+B / Left Arrow - Move back one character",
    "⌨️  Shortcut: Ctrl+F / Right Arrow - Move forward one character",
    "⌨️  Shortcut: Alt+B - Move back one word",
    "⌨️  Shortcut: Alt+F - Move forward one word",
    "⌨️  Shortcut: Ctrl+K - Delete from cursor to end of line",
    "⌨️  Shortcut: Ctrl+U - Delete from cursor to beginning of line",
    "⌨️  Shortcut: Ctrl+W - Delete word before cursor",
    "⌨️  Shortcut: Alt+D - Delete word after cursor",
    "⌨️  Shortcut: Ctrl+Y - Paste last deleted text",
    "⌨️  Shortcut: Ctrl+T - Swap last two characters",
    "⌨️  Shortcut: Alt+T - Swap last two words",
    "⌨️  Shortcut: Ctrl+_ - Undo last change",
    "⌨️  Shortcut: Ctrl+R - Reverse search command history",
    "⌨️  Shortcut: Ctrl+S - Forward search (after Ctrl+R)",
    "⌨️  Shortcut: Ctrl+P / Up Arrow - Previous command in history",
    "⌨️  Shortcut: Ctrl+N / Down Arrow - Next command in history",
    "⌨️  Shortcut: Alt+. - Insert last argument of previous command",
    "⌨️  Shortcut: !$ - Refer to last argument of previous command",
    "⌨️  Shortcut: !* - Refer to all arguments of previous command",
    "⌨️  Shortcut: !command - Run most recent command starting with 'command'",
    "⌨️  Shortcut: !123 - Run command number 123 from history",
    "⌨️  Shortcut: !! - Repeat last command",
    "⌨️  Shortcut: sudo !! - Run last command with sudo",
    "⌨️  Shortcut: Ctrl+L - Clear screen (keep current line)",
    "⌨️  Shortcut: Ctrl+S - Stop output to screen",
    "⌨️  Shortcut: Ctrl+Q - Resume output to screen",
    "⌨️  Shortcut: Ctrl+C - Interrupt/kill current command",
    "⌨️  Shortcut: Ctrl+Z - Suspend current command (use 'fg' to resume)",
    "⌨️  Shortcut: Ctrl+D - Exit shell or close connection",
];

pub static TRICK_TIPS: &[&str] = &[
    "🎯 Trick: Use $(command) for command substitution, e.g., echo $(date)",
    "🎯 Trick: Use {a,b,c} for brace expansion, e.g., touch file{1,2,3}.txt",
    "🎯 Trick: Use {1..10} for ranges, e.g., echo {1..10}",
    "🎯 Trick: Use && to chain commands (run if previous succeeds)",
    "🎯 Trick: Use || to run command only if previous fails",
    "🎯 Trick: Use ; to run commands sequentially regardless of success",
    "🎯 Trick: 'cd -' returns to previous directory",
    "🎯 Trick: 'cd ~username' goes to another user's home directory",
    "🎯 Trick: Use 'pushd' and 'popd' to maintain directory stack",
    "🎯 Trick: Use 'dirs -v' to see directory stack with numbers",
    "🎯 Trick: Use '>' to redirect output, '>>' to append",
    "🎯 Trick: Use '2>' to redirect errors, '&>' to redirect both",
    "🎯 Trick: Use '<' to redirect input from file",
    "🎯 Trick: Use '|' to pipe output to another command",
    "🎯 Trick: Use 'tee' to write to file AND display output",
    "🎯 Trick: Use '/dev/null' as black hole for unwanted output",
    "🎯 Trick: Set variable: VAR=value, use: $VAR or ${VAR}",
    "🎯 Trick: Export for subprocesses: export VAR=value",
    "🎯 Trick: Create alias: alias ll='ls -lah'",
    "🎯 Trick: See all aliases: alias",
    "🎯 Trick: Remove alias: unalias name",
    "🎯 Trick: Add '&' at end to run command in background",
    "🎯 Trick: Use 'jobs' to see background jobs, 'fg %1' to bring to front",
    "🎯 Trick: Use 'disown' to detach job from terminal",
    "🎯 Trick: Use 'nohup command &' to run immune to hangups",
    "🎯 Trick: Use 'history -c' to clear history",
    "🎯 Trick: Prefix command with space to exclude from history",
    "🎯 Trick: Set HISTCONTROL=ignoredups to ignore duplicates",
    "🎯 Trick: Use Ctrl+R then Ctrl+R to cycle through matches",
    "🎯 Trick: Use '^old^new' to replace in last command and run",
    "🎯 Trick: Use 'fc' to edit last command in $EDITOR",
    "🎯 Trick: Use ':s/old/new/' in !! for substitution",
    "🎯 Trick: Use !! for last command, e.g., sudo !!",
    "🎯 Trick: Use !$ for last argument, e.g., cat !$",
    "🎯 Trick: Use !* for all arguments, e.g., git add !*",
    "🎯 Trick: Use mkdir -p path/to/deep/dir to create nested dirs",
    "🎯 Trick: Use touch {a,b,c}.txt to create multiple files",
    "🎯 Trick: Use !! | less to page through last command's output",
    "🎯 Trick: Use * for any characters, ? for single character",
    "🎯 Trick: Use [abc] to match a, b, or c",
    "🎯 Trick: Use [0-9] for digit range, [a-z] for letters",
    "🎯 Trick: Use {*.txt,*.md} to match multiple patterns",
    "🎯 Trick: Use 'time command' to measure execution time",
    "🎯 Trick: Use 'watch -n 2 command' to run command every 2 seconds",
    "🎯 Trick: Use 'yes | command' to auto-answer prompts with yes",
    "🎯 Trick (macOS): Use 'open .' to open current directory in Finder",
    "🎯 Trick (macOS): Use 'pbcopy < file' to copy file to clipboard",
    "🎯 Trick (macOS): Use 'pbpaste > file' to paste clipboard to file",
    "🎯 Trick (macOS): Use 'caffeinate' to prevent Mac from sleeping",
];

pub static OS_TIPS: &[&str] = &[
    "🐧 Linux: 'df -h' - Check disk space in human-readable format",
    "🐧 Linux: 'du -sh *' - See folder sizes in current directory",
    "🐧 Linux: 'find . -name \"*.py\"' - Find files by name pattern",
    "🐧 Linux: 'find . -type f -size +100M' - Find files larger than 100MB",
    "🐧 Linux: 'find . -mtime -7' - Find files modified in last 7 days",
    "🐧 Linux: 'chmod +x script.sh' - Make file executable",
    "🐧 Linux: 'chmod 644 file.txt' - Set read/write for owner, read for others",
    "🐧 Linux: 'chown user:group file' - Change file ownership",
    "🐧 Linux: 'ln -s /path/to/file linkname' - Create symbolic link",
    "🐧 Linux: 'rsync -avz source/ dest/' - Sync files with progress",
    "🐧 Linux: 'grep -r \"pattern\" .' - Search recursively in files",
    "🐧 Linux: 'grep -i \"text\" file' - Case-insensitive search",
    "🐧 Linux: 'grep -v \"exclude\" file' - Show lines NOT matching pattern",
    "🐧 Linux: 'sed 's/old/new/g' file' - Replace text in file",
    "🐧 Linux: 'awk '{print $1}' file' - Print first column",
    "🐧 Linux: 'cut -d',' -f1,3 file.csv' - Extract CSV columns",
    "🐧 Linux: 'sort file | uniq -c' - Count unique lines",
    "🐧 Linux: 'wc -l file' - Count lines in file",
    "🐧 Linux: 'head -n 20 file' - Show first 20 lines",
    "🐧 Linux: 'tail -f file.log' - Follow log file in real-time",
    "🐧 Linux: 'top' or 'htop' - Monitor system processes",
    "🐧 Linux: 'ps aux | grep process' - Find running processes",
    "🐧 Linux: 'kill -9 PID' - Force kill a process",
    "🐧 Linux: 'killall process_name' - Kill all processes by name",
    "🐧 Linux: 'bg' and 'fg' - Background/foreground jobs",
    "🐧 Linux: 'nohup command &' - Run command immune to hangups",
    "🐧 Linux: 'jobs' - List background jobs",
    "🐧 Linux: 'curl -O url' - Download file from URL",
    "🐧 Linux: 'wget url' - Download files",
    "🐧 Linux: 'ping -c 4 google.com' - Test network connectivity",
    "🐧 Linux: 'netstat -tuln' - Show listening ports",
    "🐧 Linux: 'ss -tuln' - Modern alternative to netstat",
    "🐧 Linux: 'ifconfig' or 'ip addr' - Show network interfaces",
    "🐧 Linux: 'scp file user@host:/path' - Secure copy to remote",
    "🐧 Linux: 'ssh user@host' - Connect to remote server",
    "🐧 Linux: 'uname -a' - Show system information",
    "🐧 Linux: 'uptime' - Show system uptime and load",
    "🐧 Linux: 'free -h' - Show memory usage",
    "🐧 Linux: 'lsblk' - List block devices (disks)",
    "🐧 Linux: 'lscpu' - Display CPU information",
    "🐧 Linux: 'env' - Show environment variables",
    "🐧 Linux: 'which command' - Show command path",
    "🐧 Linux: 'whereis command' - Locate binary, source, manual",
    "🐧 Linux: 'tar -xzvf file.tar.gz' - Extract .tar.gz",
    "🐧 Linux: 'tar -czvf archive.tar.gz folder/' - Create .tar.gz",
    "🐧 Linux: 'unzip file.zip' - Extract zip file",
    "🐧 Linux: 'zip -r archive.zip folder/' - Create zip",
    "🐧 Linux: 'sudo command' - Run command as superuser",
    "🐧 Linux: 'sudo su' - Switch to root user",
    "🐧 Linux: 'whoami' - Display current username",
    "🐧 Linux: 'id' - Show user and group IDs",
    "🐧 Linux: 'passwd' - Change password",
    "🐧 Linux: 'command 2>&1 | tee log.txt' - Save output to file AND display",
    "🐧 Linux: 'command > /dev/null 2>&1' - Suppress all output",
    "🐧 Linux: 'watch -n 2 command' - Run command every 2 seconds",
    "🐧 Linux: 'xargs' - Build command from standard input",
    "🐧 Linux: 'yes | command' - Auto-answer yes to prompts",
];

pub static ASSISTANT_TIPS: &[&str] = &[
    "🤖 Copilot: Use '@workspace' to ask about your codebase",
    "🤖 Copilot: Use '#file' to reference specific files",
    "🤖 Copilot: Type '/' for slash commands",
    "🤖 Copilot: Use 'gh' CLI for GitHub operations",
    "🤖 Copilot: Break complex tasks into smaller steps",
    "🤖 Copilot: Ask for explanations of unfamiliar code",
];

pub static VERSION_CONTROL_TIPS: &[&str] = &[
    "🌿 Git: 'git status' - Show working tree status",
    "🌿 Git: 'git add -A' - Stage all changes",
    "🌿 Git: 'git add -p' - Stage changes interactively",
    "🌿 Git: 'git commit -m \"message\"' - Commit with message",
    "🌿 Git: 'git commit --amend' - Modify last commit",
    "🌿 Git: 'git commit --amend --no-edit' - Add to last commit, keep message",
    "🌿 Git: 'git log --oneline' - Compact commit history",
    "🌿 Git: 'git log --graph --oneline --all' - Visual branch history",
    "🌿 Git: 'git log -p' - Show changes in each commit",
    "🌿 Git: 'git log --author=\"name\"' - Filter commits by author",
    "🌿 Git: 'git show commit_hash' - Show specific commit details",
    "🌿 Git: 'git blame file' - See who changed each line",
    "🌿 Git: 'git branch' - List local branches",
    "🌿 Git: 'git branch -a' - List all branches (including remote)",
    "🌿 Git: 'git branch new-branch' - Create new branch",
    "🌿 Git: 'git checkout branch' - Switch to branch",
    "🌿 Git: 'git checkout -b new-branch' - Create and switch to new branch",
    "🌿 Git: 'git branch -d branch' - Delete merged branch",
    "🌿 Git: 'git branch -D branch' - Force delete branch",
    "🌿 Git: 'git merge branch' - Merge branch into current",
    "🌿 Git: 'git remote -v' - Show remote repositories",
    "🌿 Git: 'git fetch' - Download remote changes (don't merge)",
    "🌿 Git: 'git pull' - Fetch and merge remote changes",
    "🌿 Git: 'git push' - Push commits to remote",
    "🌿 Git: 'git push -u origin branch' - Push and set upstream",
    "🌿 Git: 'git push --force-with-lease' - Safer force push",
    "🌿 Git: 'git diff' - Show unstaged changes",
    "🌿 Git: 'git diff --staged' - Show staged changes",
    "🌿 Git: 'git restore file' - Discard changes in file",
    "🌿 Git: 'git restore --staged file' - Unstage file",
    "🌿 Git: 'git reset HEAD~1' - Undo last commit (keep changes)",
    "🌿 Git: 'git reset --hard HEAD~1' - Undo last commit (delete changes)",
    "🌿 Git: 'git revert commit_hash' - Create new commit undoing changes",
    "🌿 Git: 'git stash' - Save changes temporarily",
    "🌿 Git: 'git stash pop' - Apply and remove latest stash",
    "🌿 Git: 'git stash list' - List all stashes",
    "🌿 Git: 'git stash apply stash@{0}' - Apply specific stash",
    "🌿 Git: 'git stash drop' - Delete latest stash",
    "🌿 Git: 'git rebase main' - Rebase current branch on main",
    "🌿 Git: 'git rebase -i HEAD~3' - Interactive rebase last 3 commits",
    "🌿 Git: 'git cherry-pick commit_hash' - Apply specific commit",
    "🌿 Git: 'git clean -fd' - Remove untracked files and directories",
    "🌿 Git: 'git reflog' - Show history of HEAD changes",
    "🌿 Git: 'git bisect start' - Binary search for bug introduction",
];
